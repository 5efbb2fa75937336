//! End-to-end tests for the import pipeline, run against the in-memory
//! store.

use std::sync::Arc;

use geodata_core::import::{ImportError, Importer};
use geodata_core::store::{GeoStore, MemoryStore};
use geodata_core::{NewCity, NewCountry};

async fn import(
    store: Arc<MemoryStore>,
    input: &str,
    workers: usize,
) -> Result<geodata_core::import::ImportStats, ImportError> {
    Importer::new(store).import(input.as_bytes(), workers).await
}

#[tokio::test]
async fn test_wrong_header_rejects_whole_file() {
    let store = Arc::new(MemoryStore::new());

    // Header is missing the ip_address column.
    let input = "\
country_code,country,city,latitude,longitude,mystery_value
LI,Guyana,Port Karson,-78.2274228596799,-163.26218895343357,1337885276";

    let err = import(Arc::clone(&store), input, 2).await.unwrap_err();
    assert!(matches!(err, ImportError::InvalidFormat));

    assert!(store.countries().await.unwrap().is_empty());
    assert!(store.cities().await.is_empty());
    assert!(store.locations().await.is_empty());
}

#[tokio::test]
async fn test_reordered_header_rejected() {
    let store = Arc::new(MemoryStore::new());

    let input = "\
country_code,ip_address,country,city,latitude,longitude,mystery_value
SI,200.106.141.15,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332,7823011346";

    let err = import(Arc::clone(&store), input, 2).await.unwrap_err();
    assert!(matches!(err, ImportError::InvalidFormat));
    assert!(store.locations().await.is_empty());
}

#[tokio::test]
async fn test_good_file_imports_all_rows() {
    let store = Arc::new(MemoryStore::new());

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332,7823011346
200.106.141.16,SI,Nepal,TestCity2,-84.87503094689832,7.206435933364332,7823011346
160.103.7.140,CZ,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115";

    let stats = import(Arc::clone(&store), input, 2).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.good, 3);
    assert_eq!(stats.failed, 0);

    assert_eq!(store.countries().await.unwrap().len(), 2);
    assert_eq!(store.cities().await.len(), 3);
    assert_eq!(store.locations().await.len(), 3);
}

#[tokio::test]
async fn test_blank_lines_are_skipped_without_counting() {
    let store = Arc::new(MemoryStore::new());

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value

200.106.141.15,SI,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332,7823011346

160.103.7.140,CZ,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115
";

    let stats = import(Arc::clone(&store), input, 2).await.unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.good, 2);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_empty_input_yields_zero_statistics() {
    let store = Arc::new(MemoryStore::new());

    let stats = import(Arc::clone(&store), "", 4).await.unwrap();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.good, 0);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_malformed_rows_are_counted_not_fatal() {
    let store = Arc::new(MemoryStore::new());

    // Bad latitude, bad mystery value, bad ip and an empty country code
    // mixed in with two valid rows.
    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332,7823011346
70.95.73.73,TL,Saudi Arabia,Gradymouth,not-a-number,-49.16675918861615,2559997162
125.159.20.54,LI,Guyana,Port Karson,-78.2274228596799,-163.26218895343357,not-a-number
not-an-ip,CZ,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115
160.103.7.140,,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115
160.103.7.141,CZ,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115";

    let stats = import(Arc::clone(&store), input, 3).await.unwrap();

    assert_eq!(stats.total, 6);
    assert_eq!(stats.good, 2);
    assert_eq!(stats.failed, 4);
    assert_eq!(stats.total, stats.good + stats.failed);

    assert_eq!(store.locations().await.len(), 2);
}

#[tokio::test]
async fn test_row_with_wrong_field_count_aborts_run() {
    let store = Arc::new(MemoryStore::new());

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332";

    let err = import(Arc::clone(&store), input, 2).await.unwrap_err();
    assert!(matches!(err, ImportError::Read(_)));
}

#[tokio::test]
async fn test_shared_country_codes_resolve_exactly_once() {
    let store = Arc::new(MemoryStore::new());

    // Many rows over a small set of codes. Every code is pinned to one
    // worker, so each is created exactly once despite 4 workers running.
    let mut input = String::from(
        "ip_address,country_code,country,city,latitude,longitude,mystery_value\n",
    );
    let codes = ["AA", "BB", "CC"];
    for i in 0..42 {
        let code = codes[i % codes.len()];
        input.push_str(&format!(
            "10.0.{}.{},{code},Country {code},City {code} {},1.5,2.5,{}\n",
            i / 250,
            i % 250,
            i / codes.len(),
            1000 + i,
        ));
    }

    let stats = import(Arc::clone(&store), &input, 4).await.unwrap();

    assert_eq!(stats.total, 42);
    assert_eq!(stats.good, 42);
    assert_eq!(stats.failed, 0);

    // One country per distinct code, one creation attempt per code.
    assert_eq!(store.countries().await.unwrap().len(), codes.len());
    for code in codes {
        assert_eq!(store.country_create_attempts(code).await, 1);
    }

    // One city per distinct (city, country) pair.
    assert_eq!(store.cities().await.len(), 42);
}

#[tokio::test]
async fn test_preexisting_country_triggers_cache_reload() {
    let store = Arc::new(MemoryStore::new());

    // Seed state from an "earlier run": a country with one city.
    let seeded = store
        .create_country(NewCountry {
            code: "SI".to_string(),
            name: "Slovenia".to_string(),
        })
        .await
        .unwrap();
    store
        .create_city(NewCity {
            country_id: seeded.id,
            name: "Maribor".to_string(),
        })
        .await
        .unwrap();

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Slovenia,Maribor,46.55,15.64,7823011346
200.106.141.16,SI,Slovenia,Ljubljana,46.05,14.50,7823011347";

    let stats = import(Arc::clone(&store), input, 2).await.unwrap();

    assert_eq!(stats.good, 2);
    assert_eq!(stats.failed, 0);

    // The duplicate create was followed by a reload, not a failure, and
    // no second country or duplicate city appeared.
    assert_eq!(store.country_create_attempts("SI").await, 2);
    assert_eq!(store.countries().await.unwrap().len(), 1);
    assert_eq!(store.cities().await.len(), 2);
}

#[tokio::test]
async fn test_preexisting_country_without_cities_reloads_empty() {
    let store = Arc::new(MemoryStore::new());

    store
        .create_country(NewCountry {
            code: "CZ".to_string(),
            name: "Nicaragua".to_string(),
        })
        .await
        .unwrap();

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
160.103.7.140,CZ,Nicaragua,New Neva,-68.31023296602508,-37.62435199624531,7301823115";

    let stats = import(Arc::clone(&store), input, 2).await.unwrap();

    assert_eq!(stats.good, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(store.cities().await.len(), 1);
}

#[tokio::test]
async fn test_zero_workers_is_clamped() {
    let store = Arc::new(MemoryStore::new());

    let input = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Nepal,DuBuquemouth,-84.87503094689836,7.206435933364332,7823011346";

    let stats = import(Arc::clone(&store), input, 0).await.unwrap();

    assert_eq!(stats.good, 1);
    assert_eq!(stats.failed, 0);
}
