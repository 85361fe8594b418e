use retrofit_game::{
    Catalog, Economy, KeyValueStore, MemoryStore, Part, SAVE_KEY, SaveData, SaveManager,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn played_economy() -> Economy {
    let mut economy = Economy::new(Catalog::fallback());
    economy.buy("car_01").unwrap();
    economy.restore("car_01").unwrap();
    economy.upgrade("car_01", Part::Engine, 3).unwrap();
    economy.buy("car_03").unwrap();
    economy
}

#[test]
fn export_import_reproduces_the_session() {
    let economy = played_economy();
    let mut saves = SaveManager::new(MemoryStore::default());
    saves.save(&SaveData::capture(&economy)).unwrap();

    let exported = saves.export_snapshot().unwrap();
    let mut other = SaveManager::new(MemoryStore::default());
    other.import_snapshot(&exported).unwrap();

    let resumed = other.load().unwrap().into_economy(Catalog::fallback());
    assert_eq!(resumed.budget(), economy.budget());
    assert_eq!(resumed.garage(), economy.garage());
    assert_eq!(resumed.ledger(), economy.ledger());
    // owned ids never reappear in the offer pool
    assert!(resumed.available_vehicle("car_01").is_none());
    assert!(resumed.available_vehicle("car_03").is_none());
    assert!(resumed.available_vehicle("car_02").is_some());
}

#[test]
fn save_payload_uses_the_stable_wire_shape() {
    let economy = played_economy();
    let mut saves = SaveManager::new(MemoryStore::default());
    saves.save(&SaveData::capture(&economy)).unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&saves.export_snapshot().unwrap()).unwrap();
    assert!(payload["budget"].is_i64());
    assert!(payload["garage"].is_array());
    assert!(payload["transactionHistory"].is_array());
    assert!(payload["timestamp"].is_string());

    let first_owned = &payload["garage"][0];
    assert!(first_owned.get("engineLevel").is_some());
    assert!(first_owned.get("baseTopSpeed").is_some());
    assert!(first_owned.get("price_base").is_some());
}

#[test]
fn corrupt_save_falls_back_to_fresh_state() {
    init_logs();
    let mut store = MemoryStore::default();
    store.set(SAVE_KEY, r#"{"budget": "what", "garage": 7}"#).unwrap();
    let mut saves = SaveManager::new(store);

    assert!(saves.load().is_none());
    // the caller's fallback path
    let economy = Economy::new(Catalog::fallback());
    assert_eq!(economy.budget(), 10_000);
    assert_eq!(economy.available().len(), 3);
}

#[test]
fn backup_mirror_survives_primary_loss() {
    let economy = played_economy();
    let data = SaveData::capture(&economy);

    let mut saves = SaveManager::new(MemoryStore::default());
    saves.save(&data).unwrap();
    saves.backup(&data).unwrap();
    saves.clear().unwrap();
    assert!(saves.load().is_none());

    assert!(saves.restore_from_backup());
    let restored = saves.load().unwrap();
    assert_eq!(restored.budget, data.budget);
    assert_eq!(restored.garage, data.garage);
}

#[test]
fn legacy_payload_without_history_still_loads() {
    let mut store = MemoryStore::default();
    store
        .set(
            SAVE_KEY,
            r##"{
                "budget": 4200,
                "garage": [{
                    "id": "car_02",
                    "name": "Kombi 1985",
                    "price_base": 8000,
                    "buy_price": 3500,
                    "condition": 60,
                    "baseTopSpeed": 100,
                    "baseAcceleration": 6,
                    "baseHandling": 5,
                    "engineLevel": 2,
                    "tiresLevel": 1,
                    "suspensionLevel": 1,
                    "paint": "#00FF00"
                }],
                "timestamp": "2026-08-08T12:00:00Z"
            }"##,
        )
        .unwrap();
    let mut saves = SaveManager::new(store);

    let data = saves.load().unwrap();
    assert!(data.transaction_history.is_empty());

    let economy = data.into_economy(Catalog::fallback());
    assert_eq!(economy.budget(), 4_200);
    assert_eq!(economy.vehicle_in_garage("car_02").unwrap().engine_level, 2);
    assert!(economy.available_vehicle("car_02").is_none());
}
