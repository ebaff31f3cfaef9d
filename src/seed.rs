use tracing::info;

use crate::{
    application::{
        dto::{CreateVehicleRequest, ListVehiclesQueryRequest},
        vehicle_service::VehicleService,
    },
    domain::{errors::DomainError, listing::SortOrder, vehicle::VehicleSortBy},
};

pub fn sample_catalog() -> Vec<CreateVehicleRequest> {
    [
        ("Toyota", "Corolla", 2022, "prata", 129_900.0),
        ("Honda", "Civic", 2021, "preto", 119_500.0),
        ("Volkswagen", "Gol", 2019, "branco", 48_900.0),
        ("Chevrolet", "Onix", 2023, "vermelho", 84_990.0),
        ("Fiat", "Toro", 2020, "cinza", 112_000.0),
        ("Jeep", "Compass", 2022, "azul", 168_700.0),
    ]
    .into_iter()
    .map(|(brand, model, year, color, price)| CreateVehicleRequest {
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        color: color.to_string(),
        price,
        image_url: None,
        status: None,
    })
    .collect()
}

/// Adds the sample catalog when no vehicle exists yet. Returns how many were added.
pub async fn seed_catalog(vehicles: &VehicleService) -> Result<usize, DomainError> {
    let existing = vehicles
        .list_vehicles(ListVehiclesQueryRequest {
            page: 1,
            per_page: 1,
            search: None,
            status: None,
            min_price: None,
            max_price: None,
            sort_by: VehicleSortBy::default(),
            order: SortOrder::default(),
        })
        .await?;
    if existing.total > 0 {
        info!(total = existing.total, "catalog already populated, skipping seed");
        return Ok(0);
    }

    let catalog = sample_catalog();
    let count = catalog.len();
    for request in catalog {
        vehicles.create_vehicle(request).await?;
    }

    info!(count, "sample catalog seeded");
    Ok(count)
}
