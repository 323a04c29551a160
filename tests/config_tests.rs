use rental_core::{
    calendar::MonthEndPolicy,
    config::{Config, ConfigManager},
    currency::CurrencyCode,
    errors::RentalError,
    LateFeePolicy,
};
use tempfile::TempDir;

#[test]
fn load_without_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert!(!manager.path().exists());
}

#[test]
fn saved_config_round_trips() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = Config {
        currency: CurrencyCode::new("qar"),
        month_end: MonthEndPolicy::RollOver,
        late_fee: LateFeePolicy {
            daily_rate: 120.0,
            grace_days: 3,
            max_fee: Some(3000.0),
        },
        ..Config::default()
    };

    manager.save(&config).unwrap();
    let loaded = manager.load().unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.schedule_generator().month_end(), MonthEndPolicy::RollOver);
}

#[test]
fn invalid_config_is_not_saved() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = Config {
        late_fee: LateFeePolicy {
            daily_rate: -5.0,
            ..LateFeePolicy::default()
        },
        ..Config::default()
    };
    assert!(matches!(manager.save(&config), Err(RentalError::Config(_))));
    assert!(!manager.path().exists());
}

#[test]
fn malformed_file_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(manager.path(), "{ \"month_end\": \"sideways\" }").unwrap();
    assert!(matches!(manager.load(), Err(RentalError::Config(_))));
}

#[test]
fn schedule_amounts_use_currency_minor_units() {
    let config = Config {
        currency: CurrencyCode::new("JPY"),
        ..Config::default()
    };
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let schedule = config
        .schedule_generator()
        .generate(start, None, 1000.4, 2500.0)
        .unwrap();
    let amounts: Vec<f64> = schedule.iter().map(|i| i.amount()).collect();
    assert_eq!(amounts, vec![1000.0, 1000.0, 500.0]);
}
