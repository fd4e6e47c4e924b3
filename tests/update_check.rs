//! Update checks through the service

mod helper;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rstest::rstest;

use helper::{
    AlwaysAvailable, BuiltPackages, CountingRecordStore, create_test_service, record, seeded_store,
};
use langpack_resolver::request::{LanguagePackQuery, UpdateCheckRequest};
use langpack_resolver::translation::types::{InstalledTranslationMeta, ProjectType};

fn de_de_history() -> CountingRecordStore {
    CountingRecordStore::new()
        .with_record(ProjectType::Core, "default", record("de_DE", "5.2", "2020-01-01"))
        .with_record(ProjectType::Core, "default", record("de_DE", "5.3", "2020-02-01"))
}

fn update_request(
    version: Option<&str>,
    current_version: Option<&str>,
    installed: &[(&str, &str)],
) -> UpdateCheckRequest {
    UpdateCheckRequest {
        query: LanguagePackQuery {
            project_type: ProjectType::Core,
            domain: "default".to_string(),
            version: version.map(str::to_string),
            languages: vec!["de_DE".to_string()],
            secure: true,
        },
        current_version: current_version.map(str::to_string),
        language_data: installed
            .iter()
            .map(|(language, date)| {
                (language.to_string(), InstalledTranslationMeta::revised_at(date))
            })
            .collect(),
    }
}

#[rstest]
#[case(Some("5.2.1"), "5.2")]
#[case(None, "5.3")]
fn offers_best_version_for_target(#[case] target: Option<&str>, #[case] expected: &str) {
    let (service, _cache) = create_test_service(Arc::new(de_de_history()), Arc::new(AlwaysAvailable));

    let packs = service.check_update(&update_request(target, Some("5.1"), &[]));

    assert_eq!(packs.len(), 1);
    assert_eq!(packs[0].version, expected);
    assert_eq!(
        packs[0].package,
        format!("https://global.wordpress.org/builds/core/{expected}/de_DE.zip")
    );
}

#[test]
fn paired_update_needed_when_pack_is_newer_and_site_is_behind() {
    let (service, _cache) = create_test_service(Arc::new(de_de_history()), Arc::new(AlwaysAvailable));

    let packs = service.check_update(&update_request(
        Some("5.3"),
        Some("5.2"),
        &[("de_DE", "2020-01-15 10:30+0000")],
    ));

    assert_eq!(packs.len(), 1);
    assert_eq!(packs[0].version, "5.3");
}

#[test]
fn paired_update_not_needed_when_site_is_current() {
    let store = CountingRecordStore::new()
        .with_record(ProjectType::Core, "default", record("de_DE", "5.3", "2020-01-01"));
    let (service, _cache) = create_test_service(Arc::new(store), Arc::new(AlwaysAvailable));

    let packs = service.check_update(&update_request(
        Some("5.3"),
        Some("5.3"),
        &[("de_DE", "2020-01-15 10:30+0000")],
    ));

    assert!(packs.is_empty());
}

#[rstest]
#[case(Some("5.2"))]
#[case(Some("5.3"))]
#[case(None)]
fn installed_refresh_ignores_software_version(#[case] current_version: Option<&str>) {
    let store = CountingRecordStore::new()
        .with_record(ProjectType::Core, "default", record("de_DE", "5.3", "2020-01-01"));
    let (service, _cache) = create_test_service(Arc::new(store), Arc::new(AlwaysAvailable));

    let packs = service.check_installed(&update_request(
        Some("5.3"),
        current_version,
        &[("de_DE", "2020-01-15 10:30+0000")],
    ));

    assert!(packs.is_empty());
}

#[test]
fn en_us_is_never_offered() {
    let store = de_de_history().with_record(
        ProjectType::Core,
        "default",
        record("en_US", "5.3", "2020-02-01"),
    );
    let store = Arc::new(store);
    let (service, _cache) = create_test_service(store.clone(), Arc::new(AlwaysAvailable));
    let mut request = update_request(None, None, &[]);
    request.query.languages = vec!["en_US".to_string(), "de_DE".to_string()];

    let packs = service.check_update(&request);

    let languages: Vec<&str> = packs.iter().map(|p| p.language.as_str()).collect();
    assert_eq!(languages, vec!["de_DE"]);
    assert_eq!(store.language_calls(), 1);
}

#[test]
fn unbuilt_packages_are_not_offered() {
    let built = BuiltPackages(HashSet::from(["core/5.2/de_DE.zip".to_string()]));
    let (service, _cache) = create_test_service(Arc::new(de_de_history()), Arc::new(built));

    assert!(service.check_update(&update_request(Some("5.3"), None, &[])).is_empty());
    assert_eq!(
        service.check_update(&update_request(Some("5.2"), None, &[]))[0].version,
        "5.2"
    );
}

#[test]
fn unknown_language_is_negatively_cached() {
    let store = Arc::new(de_de_history());
    let (service, _cache) = create_test_service(store.clone(), Arc::new(AlwaysAvailable));
    let mut request = update_request(None, None, &[]);
    request.query.languages = vec!["ja".to_string()];

    assert!(service.check_update(&request).is_empty());
    assert!(service.check_installed(&request).is_empty());

    assert_eq!(store.language_calls(), 1);
}

#[test]
fn update_check_reads_sqlite_records() {
    let store = seeded_store(
        ProjectType::Theme,
        "twentytwenty",
        &[
            record("fr_FR", "1.1", "2020-01-01 00:00:00"),
            record("fr_FR", "1.2", "2020-03-01 00:00:00"),
        ],
    );
    let (service, _cache) = create_test_service(Arc::new(store), Arc::new(AlwaysAvailable));
    let request = UpdateCheckRequest {
        query: LanguagePackQuery {
            project_type: ProjectType::Theme,
            domain: "twentytwenty".to_string(),
            version: Some("1.2".to_string()),
            languages: vec!["fr_FR".to_string()],
            secure: false,
        },
        current_version: Some("1.1".to_string()),
        language_data: HashMap::new(),
    };

    let packs = service.check_update(&request);

    assert_eq!(
        packs[0].package,
        "http://global.wordpress.org/builds/themes/twentytwenty/1.2/fr_FR.zip"
    );
}

#[test]
fn update_check_request_parses_json_body() {
    let body = r#"{
        "type": "plugin",
        "slug": "akismet",
        "version": "4.1.2",
        "languages": ["de_DE"],
        "current_version": "4.1",
        "language_data": {"de_DE": {"PO-Revision-Date": "2020-01-15 10:30+0000"}}
    }"#;

    let request: UpdateCheckRequest = serde_json::from_str(body).unwrap();

    assert!(request.validate().is_ok());
    assert_eq!(request.query.domain, "akismet");
    assert!(request.query.secure);
    assert_eq!(
        request.language_data["de_DE"].po_revision_date.as_deref(),
        Some("2020-01-15 10:30+0000")
    );
}
