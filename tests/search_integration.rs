//! Integration tests for the search engine against a mock WebBook.

mod support;

use support::fixtures::{self, ANTHRACENE_PAGE, BENZENE_PAGE, ETHANOL_MOL, NAME_NOT_FOUND};
use support::socket_guard::start_mock_server_or_skip;
use webbook::{
    CompoundRecord, DataKind, RequestConfig, SEARCH_RESULT_CAP, SearchError, SearchParameters, SearchType,
    WebBookClient, search, union_identifiers,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, max_attempts: u32) -> WebBookClient {
    let config = RequestConfig::default()
        .with_max_attempts(max_attempts)
        .expect("valid attempts");
    WebBookClient::with_base_url(config, server.uri()).expect("client should build")
}

#[tokio::test]
async fn test_name_search_lists_identifiers() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = vec!["C120127".to_string(), "C85018".to_string()];
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Name", "anthracene"))
        .and(query_param("Units", "SI"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "anthracene", SearchType::Name, &SearchParameters::new())
        .await
        .expect("search should succeed");

    assert!(result.success);
    assert!(!result.lost);
    assert_eq!(result.identifiers, ids);
    assert!(result.compounds.is_empty());
}

#[tokio::test]
async fn test_formula_search_at_cap_is_lost() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = fixtures::ids(SEARCH_RESULT_CAP);
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Formula", "C6H?O?"))
        .respond_with(fixtures::html(fixtures::listing(&ids, true)))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "C6H?O?", SearchType::Formula, &SearchParameters::new())
        .await
        .expect("search should succeed");

    assert!(result.success);
    assert!(result.lost);
    assert_eq!(result.len(), SEARCH_RESULT_CAP);
}

#[tokio::test]
async fn test_listing_at_cap_without_marker_is_lost() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = fixtures::ids(SEARCH_RESULT_CAP);
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "C6H?O?", SearchType::Formula, &SearchParameters::new())
        .await
        .expect("search should succeed");
    assert!(result.lost);
    assert_eq!(result.len(), SEARCH_RESULT_CAP);
}

#[tokio::test]
async fn test_name_search_below_cap_is_not_lost() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = fixtures::ids(SEARCH_RESULT_CAP - 1);
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "ane", SearchType::Name, &SearchParameters::new())
        .await
        .expect("search should succeed");
    assert!(!result.lost);
    assert_eq!(result.len(), SEARCH_RESULT_CAP - 1);
}

#[tokio::test]
async fn test_not_found_is_successful_and_empty() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .respond_with(fixtures::html(NAME_NOT_FOUND))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "qwertyuiop", SearchType::Name, &SearchParameters::new())
        .await
        .expect("search should succeed");
    assert!(result.success);
    assert!(!result.lost);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_single_hit_returns_compound_directly() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "71-43-2"))
        .respond_with(fixtures::html(BENZENE_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, " 71-43-2 ", SearchType::Cas, &SearchParameters::new())
        .await
        .expect("search should succeed");

    assert_eq!(result.identifiers, vec!["C71432"]);
    assert_eq!(result.compounds.len(), 1);
    let benzene = &result.compounds[0];
    assert_eq!(benzene.name, "Benzene");
    assert_eq!(benzene.cas_rn.as_deref(), Some("71-43-2"));
    assert!(benzene.mol_2d().as_fetched().is_none());
}

#[tokio::test]
async fn test_server_error_after_retries_is_unsuccessful() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = search(&client, "benzene", SearchType::Name, &SearchParameters::new())
        .await
        .expect("a status failure is not an error");
    assert!(!result.success);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_required_data_flags_are_sent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Name", "benzene"))
        .and(query_param("cMS", "on"))
        .and(query_param("cGC", "on"))
        .respond_with(fixtures::html(fixtures::listing(&fixtures::ids(2), false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let params = SearchParameters::new()
        .requiring(DataKind::Mass)
        .requiring(DataKind::GasChromatography)
        .with_no_ion(true);
    let result = search(&client, "benzene", SearchType::Name, &params)
        .await
        .expect("search should succeed");
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_name_search_then_load_first_match() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = vec!["C120127".to_string(), "C85018".to_string()];
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Name", "anthracene"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "C120127"))
        .respond_with(fixtures::html(ANTHRACENE_PAGE))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = search(&client, "anthracene", SearchType::Name, &SearchParameters::new())
        .await
        .expect("search should succeed");
    let first = result.identifiers.first().expect("at least one hit");
    let record = CompoundRecord::load(&client, first)
        .await
        .expect("load should succeed")
        .expect("anthracene should exist");
    assert_eq!(record.formula.as_deref(), Some("C14H10"));
    assert!(record.inchi_key.as_deref().is_some_and(|key| !key.is_empty()));
}

#[tokio::test]
async fn test_load_compounds_fetches_each_hit() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let ids = vec!["C71432".to_string()];
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Name", "benzene"))
        .respond_with(fixtures::html(fixtures::listing(&ids, false)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("ID", "C71432"))
        .respond_with(fixtures::html(BENZENE_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let mut result = search(&client, "benzene", SearchType::Name, &SearchParameters::new())
        .await
        .expect("search should succeed");
    let compounds = result
        .load_compounds(&client)
        .await
        .expect("compounds should load");
    assert_eq!(compounds.len(), 1);
    assert_eq!(compounds[0].formula.as_deref(), Some("C6H6"));
}

#[tokio::test]
async fn test_partitioned_searches_union_without_duplicates() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let first = vec!["C1".to_string(), "C2".to_string()];
    let second = vec!["C2".to_string(), "C3".to_string()];
    Mock::given(method("GET"))
        .and(query_param("Formula", "C6H6"))
        .respond_with(fixtures::html(fixtures::listing(&first, false)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("Formula", "C6H7"))
        .respond_with(fixtures::html(fixtures::listing(&second, false)))
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let params = SearchParameters::new();
    let a = search(&client, "C6H6", SearchType::Formula, &params).await.expect("search a");
    let b = search(&client, "C6H7", SearchType::Formula, &params).await.expect("search b");
    assert_eq!(union_identifiers([&a, &b]), vec!["C1", "C2", "C3"]);
}

#[tokio::test]
async fn test_structure_searches_send_mol_block() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Type", "Struct"))
        .and(query_param("StructSearch", "Exact"))
        .and(query_param("MOL", ETHANOL_MOL))
        .respond_with(fixtures::html(fixtures::listing(&["C64175".to_string()], false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi/cbook.cgi"))
        .and(query_param("Type", "Struct"))
        .and(query_param("StructSearch", "Sub"))
        .and(query_param("MOL", ETHANOL_MOL))
        .respond_with(fixtures::html(fixtures::listing(&fixtures::ids(3), false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let params = SearchParameters::new();
    let exact = search(&client, ETHANOL_MOL, SearchType::StructureExact, &params)
        .await
        .expect("exact search should succeed");
    assert_eq!(exact.identifiers, vec!["C64175"]);

    let sub = search(&client, ETHANOL_MOL, SearchType::StructureSub, &params)
        .await
        .expect("substructure search should succeed");
    assert_eq!(sub.len(), 3);
}

#[tokio::test]
async fn test_invalid_structure_is_rejected_before_sending() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let err = search(&client, "not a mol block", SearchType::StructureSub, &SearchParameters::new())
        .await
        .expect_err("invalid MOL block should fail");
    assert!(matches!(err, SearchError::InvalidStructure { .. }));
}
