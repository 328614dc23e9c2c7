//! B3 listing scraper against a local HTTP server.

use b3fund_data::{B3ListingFetcher, DataError, FetcherConfig, HttpPageSource};
use mockito::{Matcher, Server};

const INDEX_PATH: &str = "/cias-listadas/empresas-listadas/BuscaEmpresaListada.aspx";
const DETAIL_PATH: &str = "/cias-listadas/empresas-listadas/ResumoEmpresaPrincipal.aspx";
const FRAME_PATH: &str = "/pt-br/resumo.aspx";

fn index_page(codes: &[&str]) -> String {
    let links: String = codes
        .iter()
        .map(|code| format!(r#"<a href="ResumoEmpresaPrincipal.aspx?codigoCvm={code}">{code}</a>"#))
        .collect();
    format!(r#"<html><body><a href="BuscaEmpresaListada.aspx">Voltar</a>{links}</body></html>"#)
}

fn detail_page(name: &str, code: &str) -> String {
    format!(
        r#"<html><body>
        <h2>{name}</h2>
        <iframe src="../../banner.html"></iframe>
        <iframe src="../../pt-br/resumo.aspx?cvm={code}"></iframe>
        </body></html>"#
    )
}

fn frame_page(tickers: &[&str], traded_name: &str, sector: &str) -> String {
    let anchors: String = tickers
        .iter()
        .map(|t| format!(r##"<a href="#">{t}</a>"##))
        .collect();
    format!(
        r##"<html><body>
        <div><a href="#">Mais Códigos</a>{anchors}</div>
        <table>
          <tr><td>Nome de Pregão:</td><td>{traded_name}</td></tr>
          <tr><td>Classificação Setorial:</td><td>{sector}</td></tr>
        </table>
        </body></html>"##
    )
}

fn fetcher(server: &Server) -> B3ListingFetcher<HttpPageSource> {
    let source = HttpPageSource::new(&FetcherConfig::default()).unwrap();
    B3ListingFetcher::new(source, &server.url(), 2).unwrap()
}

async fn mock_letter(server: &mut Server, query: Matcher, body: String) -> mockito::Mock {
    server
        .mock("GET", INDEX_PATH)
        .match_query(query)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_page(server: &mut Server, path: &str, key: &str, value: &str, body: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded(key.into(), value.into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_listing_deduplicates_and_expands_tickers() {
    let mut server = Server::new_async().await;

    let _a = mock_letter(
        &mut server,
        Matcher::UrlEncoded("Letra".into(), "A".into()),
        index_page(&["100", "200"]),
    )
    .await;
    // Company 200 is also listed under B.
    let _b = mock_letter(
        &mut server,
        Matcher::UrlEncoded("Letra".into(), "B".into()),
        index_page(&["200"]),
    )
    .await;
    let _rest = mock_letter(
        &mut server,
        Matcher::Regex("Letra=[C-Z]".into()),
        index_page(&[]),
    )
    .await;

    let d100 = mock_page(&mut server, DETAIL_PATH, "codigoCvm", "100", detail_page("ALFA S.A.", "100")).await;
    let d200 = mock_page(&mut server, DETAIL_PATH, "codigoCvm", "200", detail_page("BETA S.A.", "200")).await;
    let f100 = mock_page(
        &mut server,
        FRAME_PATH,
        "cvm",
        "100",
        frame_page(&["AAA3", "AAA4"], "ALFA", "Consumo Cíclico / Comércio / Eletrodomésticos"),
    )
    .await;
    let f200 = mock_page(
        &mut server,
        FRAME_PATH,
        "cvm",
        "200",
        frame_page(&["BBB3"], "BETA", "Utilidade Pública / Energia Elétrica"),
    )
    .await;

    let fetcher = fetcher(&server);

    let links = fetcher.fetch_detail_links().await.unwrap();
    assert_eq!(links.len(), 2);

    let records = fetcher.fetch_all().await.unwrap();

    d100.assert_async().await;
    d200.assert_async().await;
    f100.assert_async().await;
    f200.assert_async().await;

    assert_eq!(records.len(), 3);

    let alfa: Vec<_> = records.iter().filter(|r| r.company_name == "ALFA S.A.").collect();
    assert_eq!(alfa.len(), 2);
    assert_eq!(alfa[0].ticker, "AAA3");
    assert_eq!(alfa[1].ticker, "AAA4");
    for row in &alfa {
        assert_eq!(row.traded_name, "ALFA");
        assert_eq!(row.sector, "Consumo Cíclico");
        assert_eq!(row.subsector.as_deref(), Some("Comércio"));
        assert_eq!(row.segment.as_deref(), Some("Eletrodomésticos"));
    }

    let beta = records.iter().find(|r| r.ticker == "BBB3").unwrap();
    assert_eq!(beta.company_name, "BETA S.A.");
    assert_eq!(beta.subsector.as_deref(), Some("Energia Elétrica"));
    assert_eq!(beta.segment, None);
}

#[tokio::test]
async fn test_broken_company_aborts_with_url() {
    let mut server = Server::new_async().await;

    let _a = mock_letter(
        &mut server,
        Matcher::UrlEncoded("Letra".into(), "A".into()),
        index_page(&["300"]),
    )
    .await;
    let _rest = mock_letter(
        &mut server,
        Matcher::Regex("Letra=[B-Z]".into()),
        index_page(&[]),
    )
    .await;
    // Only one iframe on the detail page.
    let _d = mock_page(
        &mut server,
        DETAIL_PATH,
        "codigoCvm",
        "300",
        "<h2>GAMA S.A.</h2><iframe src=\"x.html\"></iframe>".to_string(),
    )
    .await;

    let err = fetcher(&server).fetch_all().await.unwrap_err();

    match err {
        DataError::Structure { url, reason } => {
            assert!(url.contains("codigoCvm=300"), "url was {url}");
            assert!(reason.contains("iframe"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_index_server_error_propagates() {
    let mut server = Server::new_async().await;

    let _all = server
        .mock("GET", INDEX_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = fetcher(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, DataError::Status { status, .. } if status.as_u16() == 503));
}
