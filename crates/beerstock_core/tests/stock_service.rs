use beerstock_core::db::open_db_in_memory;
use beerstock_core::{
    Beer, BeerCategory, BeerKey, BeerRepository, InMemoryBeerRepository, SqliteBeerRepository,
    StockError, StockService,
};

fn skol() -> Beer {
    Beer::new("Skol", "Skol", 100, 10, BeerCategory::Lager)
}

/// Runs `check` against both the SQLite and in-memory repositories.
fn for_each_repository(check: impl Fn(&dyn BeerRepository)) {
    let conn = open_db_in_memory().unwrap();
    check(&SqliteBeerRepository::new(&conn));
    check(&InMemoryBeerRepository::new());
}

#[test]
fn create_then_find_by_name_returns_equal_record() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let created = service.create(&skol()).unwrap();
        assert!(created.id.is_some());

        let found = service.find_by_name("Skol").unwrap();
        assert_eq!(found, created);
        assert_eq!(Beer { id: None, ..found }, skol());
    });
}

#[test]
fn duplicate_name_is_rejected_and_first_record_survives() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let first = service.create(&skol()).unwrap();

        let clash = Beer::new("Skol", "Other brand", 20, 1, BeerCategory::Ale);
        let err = service.create(&clash).unwrap_err();
        assert!(matches!(err, StockError::DuplicateName(name) if name == "Skol"));

        assert_eq!(service.find_by_name("Skol").unwrap(), first);
        assert_eq!(service.list_all().unwrap().len(), 1);
    });
}

#[test]
fn find_by_name_for_unknown_name_is_not_found() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let err = service.find_by_name("Brahma").unwrap_err();
        assert!(matches!(err, StockError::NotFound(BeerKey::Name(name)) if name == "Brahma"));
    });
}

#[test]
fn list_all_grows_with_each_create() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        assert!(service.list_all().unwrap().is_empty());

        for (index, name) in ["Skol", "Brahma", "Bohemia"].iter().enumerate() {
            service
                .create(&Beer::new(*name, "Ambev", 100, 0, BeerCategory::Pilsen))
                .unwrap();
            assert_eq!(service.list_all().unwrap().len(), index + 1);
        }
    });
}

#[test]
fn delete_removes_record_and_repeat_delete_is_not_found() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let id = service.create(&skol()).unwrap().id.unwrap();

        service.delete_by_id(id).unwrap();
        assert!(service.list_all().unwrap().is_empty());
        assert!(matches!(
            service.find_by_id(id).unwrap_err(),
            StockError::NotFound(BeerKey::Id(found)) if found == id
        ));
        assert!(matches!(
            service.delete_by_id(id).unwrap_err(),
            StockError::NotFound(BeerKey::Id(found)) if found == id
        ));
    });
}

#[test]
fn increment_within_capacity_is_persisted() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let id = service.create(&skol()).unwrap().id.unwrap();

        let updated = service.increment(id, 90).unwrap();
        assert_eq!(updated.quantity, 100);
        assert_eq!(service.find_by_id(id).unwrap().quantity, 100);
    });
}

#[test]
fn increment_past_capacity_fails_without_writing() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let id = service.create(&skol()).unwrap().id.unwrap();

        let err = service.increment(id, 91).unwrap_err();
        assert!(matches!(
            err,
            StockError::CapacityExceeded { id: found, amount: 91 } if found == id
        ));
        assert_eq!(service.find_by_id(id).unwrap().quantity, 10);
    });
}

#[test]
fn decrement_below_zero_fails_without_writing() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let id = service.create(&skol()).unwrap().id.unwrap();

        let err = service.decrement(id, 11).unwrap_err();
        assert!(matches!(
            err,
            StockError::InsufficientStock { id: found, amount: 11 } if found == id
        ));
        assert_eq!(service.find_by_id(id).unwrap().quantity, 10);
    });
}

#[test]
fn quantity_changes_on_unknown_id_are_not_found() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        assert!(matches!(
            service.increment(404, 1).unwrap_err(),
            StockError::NotFound(BeerKey::Id(404))
        ));
        assert!(matches!(
            service.decrement(404, 1).unwrap_err(),
            StockError::NotFound(BeerKey::Id(404))
        ));
    });
}

#[test]
fn skol_stock_scenario() {
    for_each_repository(|repo| {
        let service = StockService::new(repo);
        let id = service.create(&skol()).unwrap().id.unwrap();

        assert_eq!(service.increment(id, 20).unwrap().quantity, 30);

        assert!(matches!(
            service.increment(id, 90).unwrap_err(),
            StockError::CapacityExceeded { amount: 90, .. }
        ));
        assert_eq!(service.find_by_id(id).unwrap().quantity, 30);

        assert_eq!(service.decrement(id, 30).unwrap().quantity, 0);

        assert!(matches!(
            service.decrement(id, 1).unwrap_err(),
            StockError::InsufficientStock { amount: 1, .. }
        ));
        assert_eq!(service.find_by_id(id).unwrap().quantity, 0);

        service.delete_by_id(id).unwrap();
        assert!(matches!(
            service.find_by_id(id).unwrap_err(),
            StockError::NotFound(BeerKey::Id(_))
        ));
    });
}
