//! Integration tests for compound loading, resolution, and artifact fetches.

mod support;

use support::fixtures::{
    self, ARGON_PAGE, BENZENE_GC_PAGE, BENZENE_GC_TABLE, BENZENE_MOL_2D, BENZENE_MS_JDX,
    BENZENE_MS_PAGE, BENZENE_PAGE, INCHI_NOT_FOUND, NAME_NOT_FOUND,
};
use support::socket_guard::start_mock_server_or_skip;
use webbook::parser::CellValue;
use webbook::{
    Artifact, CompoundRecord, Error, RequestConfig, RequestError, Resolution, SpectrumKind,
    WebBookClient, resolve_compound,
};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WebBookClient {
    WebBookClient::with_base_url(RequestConfig::default(), server.uri())
        .expect("client should build")
}

async fn mount_benzene(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "C71432"))
        .respond_with(fixtures::html(BENZENE_PAGE))
        .mount(server)
        .await;
}

async fn load_benzene(server: &MockServer, client: &WebBookClient) -> CompoundRecord {
    mount_benzene(server).await;
    CompoundRecord::load(client, "C71432")
        .await
        .expect("load should succeed")
        .expect("benzene should exist")
}

#[tokio::test]
async fn test_load_parses_compound_page() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let client = client_for(&server);
    let record = load_benzene(&server, &client).await;

    assert_eq!(record.id, "C71432");
    assert_eq!(record.name, "Benzene");
    assert_eq!(record.inchi_key.as_deref(), Some("UHOVQNZJYSORNB-UHFFFAOYSA-N"));
    assert_eq!(record.synonyms, vec!["Annulene", "Benzol", "Cyclohexatriene"]);
    assert_eq!(record.spectra(SpectrumKind::Mass), &Artifact::NotFetched);
    assert!(record.data_reference(webbook::DataKind::Mass).is_some());
}

#[tokio::test]
async fn test_fetch_mass_spectra_single_entry_has_index_zero() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Mask", "200"))
        .respond_with(fixtures::html(BENZENE_MS_PAGE))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("JCAMP", "C71432"))
        .and(query_param("Index", "0"))
        .and(query_param("Type", "Mass"))
        .respond_with(fixtures::text(BENZENE_MS_JDX))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let spectra = record
        .fetch_spectra(&client, SpectrumKind::Mass)
        .await
        .expect("spectra should load");

    assert_eq!(spectra.len(), 1);
    assert_eq!(spectra[0].index, 0);
    assert_eq!(spectra[0].kind, SpectrumKind::Mass);
    assert_eq!(spectra[0].jdx_text, BENZENE_MS_JDX);
}

#[tokio::test]
async fn test_refetch_overwrites_with_same_result() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("Mask", "200"))
        .respond_with(fixtures::html(BENZENE_MS_PAGE))
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("JCAMP", "C71432"))
        .respond_with(fixtures::text(BENZENE_MS_JDX))
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let first = record
        .fetch_spectra(&client, SpectrumKind::Mass)
        .await
        .expect("first fetch")
        .to_vec();
    let second = record
        .fetch_spectra(&client, SpectrumKind::Mass)
        .await
        .expect("second fetch")
        .to_vec();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_spectrum_kind_is_empty_without_request() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let spectra = record
        .fetch_spectra(&client, SpectrumKind::Ir)
        .await
        .expect("missing kind is not an error");
    assert!(spectra.is_empty());
    assert_eq!(record.spectra(SpectrumKind::Ir), &Artifact::Fetched(Vec::new()));
}

#[tokio::test]
async fn test_failed_fetch_is_recorded_and_returned() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("Mask", "200"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let err = record
        .fetch_spectra(&client, SpectrumKind::Mass)
        .await
        .expect_err("503 should surface");
    assert!(matches!(
        err,
        Error::Request(RequestError::HttpStatus { status: 503, .. })
    ));
    assert!(record.spectra(SpectrumKind::Mass).failure().is_some());
}

#[tokio::test]
async fn test_save_spectra_writes_jdx_files() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("Mask", "200"))
        .respond_with(fixtures::html(BENZENE_MS_PAGE))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("JCAMP", "C71432"))
        .respond_with(fixtures::text(BENZENE_MS_JDX))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    record
        .fetch_spectra(&client, SpectrumKind::Mass)
        .await
        .expect("spectra should load");

    let dir = tempfile::tempdir().expect("tempdir");
    let paths = record
        .save_spectra(SpectrumKind::Mass, dir.path())
        .expect("save should succeed");
    assert_eq!(paths, vec![dir.path().join("C71432_MS_0.jdx")]);
    assert_eq!(
        std::fs::read_to_string(&paths[0]).expect("read jdx"),
        BENZENE_MS_JDX
    );

    let not_a_dir = dir.path().join("C71432_MS_0.jdx");
    assert!(matches!(
        record.save_spectra(SpectrumKind::Mass, &not_a_dir),
        Err(Error::NotADirectory { .. })
    ));
}

#[tokio::test]
async fn test_fetch_coordinates() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("Str2File", "C71432"))
        .respond_with(fixtures::text(BENZENE_MOL_2D))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let block = record
        .fetch_coordinates_2d(&client)
        .await
        .expect("2D file should load")
        .map(str::to_string);
    assert_eq!(block.as_deref(), Some(BENZENE_MOL_2D));
    assert_eq!(
        record.mol_2d(),
        &Artifact::Fetched(Some(BENZENE_MOL_2D.to_string()))
    );
    assert_eq!(record.mol_3d(), &Artifact::NotFetched);
}

#[tokio::test]
async fn test_coordinates_absent_are_fetched_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("ID", "C7440371"))
        .respond_with(fixtures::html(ARGON_PAGE))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut argon = CompoundRecord::load(&client, "C7440371")
        .await
        .expect("load should succeed")
        .expect("argon should exist");
    let block = argon
        .fetch_coordinates_3d(&client)
        .await
        .expect("absent file is not an error");
    assert!(block.is_none());
    assert_eq!(argon.mol_3d(), &Artifact::Fetched(None));
}

#[tokio::test]
async fn test_fetch_gas_chromatography() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("Mask", "2000"))
        .and(query_param("Type", "KOVATS-RI-NON-POLAR-ISOTHERMAL"))
        .respond_with(fixtures::html(BENZENE_GC_TABLE))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("Mask", "2000"))
        .respond_with(fixtures::html(BENZENE_GC_PAGE))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut record = load_benzene(&server, &client).await;
    let chromatograms = record
        .fetch_gas_chromatography(&client)
        .await
        .expect("GC should load");

    assert_eq!(chromatograms.len(), 1);
    let gc = &chromatograms[0];
    assert_eq!(gc.compound_id, "C71432");
    assert_eq!(gc.kind.ri_type, "Kovats' RI");
    assert_eq!(gc.kind.column_polarity, "non-polar column");
    assert_eq!(gc.kind.temperature_regime, "isothermal");
    assert_eq!(gc.table.row_count(), 2);

    let retention = gc.table.column("I").expect("I column");
    assert_eq!(retention.values[0], CellValue::Number(653.0));
    let comments = gc.table.column("Comment").expect("Comment column");
    assert_eq!(comments.values[0], CellValue::Text(String::new()));
    let references = gc.table.column("Reference").expect("Reference column");
    assert!(
        references.values[0]
            .as_text()
            .is_some_and(|text| text.starts_with("Smith, J., Retention of aromatics"))
    );
}

#[tokio::test]
async fn test_no_gas_chromatography_gives_empty_list() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("ID", "C7440371"))
        .respond_with(fixtures::html(ARGON_PAGE))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut argon = CompoundRecord::load(&client, "C7440371")
        .await
        .expect("load should succeed")
        .expect("argon should exist");
    let chromatograms = argon
        .fetch_gas_chromatography(&client)
        .await
        .expect("no GC is not an error");
    assert!(chromatograms.is_empty());
}

#[tokio::test]
async fn test_resolve_unknown_cas_is_not_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "99999-99-9"))
        .respond_with(fixtures::html(NAME_NOT_FOUND))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resolution = CompoundRecord::resolve(&client, "99999-99-9")
        .await
        .expect("resolve should succeed");
    assert_eq!(resolution, Resolution::NotFound);
    assert!(
        resolve_compound(&client, "99999-99-9")
            .await
            .expect("resolve should succeed")
            .is_none()
    );
}

#[tokio::test]
async fn test_resolve_cas_finds_compound() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "71-43-2"))
        .respond_with(fixtures::html(BENZENE_PAGE))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = resolve_compound(&client, "71-43-2")
        .await
        .expect("resolve should succeed")
        .expect("benzene should resolve");
    assert_eq!(record.id, "C71432");
}

#[tokio::test]
async fn test_resolve_ambiguous_inchi_lists_candidates() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = vec!["C95476".to_string(), "C106423".to_string()];
    Mock::given(method("GET"))
        .and(path_regex(r"^/cgi/inchi/"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let inchi = "InChI=1S/C8H10/c1-7-5-3-4-6-8(7)2/h3-6H,1-2H3";
    let resolution = CompoundRecord::resolve(&client, inchi)
        .await
        .expect("resolve should succeed");
    assert_eq!(resolution, Resolution::Ambiguous(ids));
    assert!(
        resolve_compound(&client, inchi)
            .await
            .expect("resolve should succeed")
            .is_none()
    );
}

#[tokio::test]
async fn test_resolve_unknown_inchi_is_not_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path_regex(r"^/cgi/inchi/"))
        .respond_with(fixtures::html(INCHI_NOT_FOUND))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resolution = CompoundRecord::resolve(&client, "InChI=1S/XeF8/c1-9(2,3,4,5,6,7)8")
        .await
        .expect("resolve should succeed");
    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn test_load_non_compound_page_is_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(query_param("ID", "C0"))
        .respond_with(fixtures::html(NAME_NOT_FOUND))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = CompoundRecord::load(&client, "C0")
        .await
        .expect("load should succeed");
    assert!(record.is_none());
}
