use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::{
        errors::DomainError,
        listing::{Page, contains_ignore_case, paginate},
        sale::{NewSale, PartySummary, Sale, SaleDetails, SaleListQuery, SaleSortBy},
        user::{Cpf, NewUser, Role, User, UserListQuery, UserPatch, UserSortBy},
        vehicle::{
            NewVehicle, Vehicle, VehicleListQuery, VehiclePatch, VehicleSortBy, VehicleStatus,
        },
    },
    infrastructure::{
        SaleRepository, UserRepository, VehicleRepository, snapshot::SnapshotManager,
    },
};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Documents {
    users: HashMap<Uuid, User>,
    vehicles: HashMap<Uuid, Vehicle>,
    sales: HashMap<Uuid, Sale>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    documents: Documents,
}

/// Users, vehicles and sales behind a single lock.
///
/// Every mutation runs against the whole document set, so multi-document
/// steps (placing a sale, refusing to delete a referenced document) are
/// atomic. With a snapshot file configured, a mutation is applied to a draft,
/// the draft is written to disk, and only then does it replace the live set.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<Documents>,
    snapshots: Option<SnapshotManager>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `path`, loading the existing snapshot if any.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let snapshots = SnapshotManager::new(path);
        let documents = match snapshots.load::<StoreSnapshot>()? {
            Some(snapshot) => {
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(DomainError::storage(format!(
                        "unsupported snapshot version {}",
                        snapshot.version
                    )));
                }
                info!(
                    path = %snapshots.path().display(),
                    users = snapshot.documents.users.len(),
                    vehicles = snapshot.documents.vehicles.len(),
                    sales = snapshot.documents.sales.len(),
                    "loaded store snapshot"
                );
                snapshot.documents
            }
            None => Documents::default(),
        };

        Ok(Self {
            documents: RwLock::new(documents),
            snapshots: Some(snapshots),
        })
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Documents) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut documents = self.documents.write().await;

        let Some(snapshots) = &self.snapshots else {
            return apply(&mut documents);
        };

        let mut draft = documents.clone();
        let outcome = apply(&mut draft)?;
        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            documents: draft,
        };

        // File IO runs on the blocking pool; the write lock stays held so
        // snapshots land in mutation order.
        let writer = snapshots.clone();
        let (saved, snapshot) = tokio::task::spawn_blocking(move || {
            let saved = writer.save(&snapshot);
            (saved, snapshot)
        })
        .await
        .map_err(|e| DomainError::storage(format!("snapshot task failed: {e}")))?;
        saved?;

        *documents = snapshot.documents;
        debug!(path = %snapshots.path().display(), "store snapshot written");

        Ok(outcome)
    }
}

impl Documents {
    fn user_with_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    fn user_with_cpf(&self, cpf: &Cpf) -> Option<&User> {
        self.users.values().find(|user| &user.cpf == cpf)
    }

    fn is_referenced_by_sale(&self, id: Uuid) -> bool {
        self.sales.values().any(|sale| sale.involves(id))
    }

    fn details(&self, sale: &Sale) -> Result<SaleDetails, DomainError> {
        let vehicle = self
            .vehicles
            .get(&sale.vehicle_id)
            .ok_or_else(|| DomainError::internal("sale references a missing vehicle"))?;
        let client = self
            .users
            .get(&sale.client_id)
            .ok_or_else(|| DomainError::internal("sale references a missing client"))?;
        let employee = self
            .users
            .get(&sale.employee_id)
            .ok_or_else(|| DomainError::internal("sale references a missing employee"))?;

        Ok(SaleDetails {
            sale: sale.clone(),
            vehicle: vehicle.into(),
            client: PartySummary::from(client),
            employee: PartySummary::from(employee),
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        self.mutate(|documents| {
            if documents.user_with_email(&user.email).is_some() {
                return Err(DomainError::conflict("email already exists"));
            }
            if documents.user_with_cpf(&user.cpf).is_some() {
                return Err(DomainError::conflict("cpf already exists"));
            }

            let now = Utc::now();
            let created = User {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                cpf: user.cpf,
                created_at: now,
                updated_at: now,
            };
            documents.users.insert(created.id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.documents.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.documents.read().await.user_with_email(email).cloned())
    }

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<User>, DomainError> {
        Ok(self.documents.read().await.user_with_cpf(cpf).cloned())
    }

    async fn list(&self, query: UserListQuery) -> Result<Page<User>, DomainError> {
        let mut items = self
            .documents
            .read()
            .await
            .users
            .values()
            .filter(|user| query.scope.admits(user.role))
            .filter(|user| query.role.is_none_or(|role| user.role == role))
            .cloned()
            .collect::<Vec<_>>();

        if let Some(search) = query.search.as_deref() {
            let cpf_digits = Cpf::search_digits(search);
            items.retain(|user| {
                contains_ignore_case(&user.name, search)
                    || contains_ignore_case(&user.email, search)
                    || cpf_digits
                        .as_deref()
                        .is_some_and(|digits| user.cpf.as_str().contains(digits))
            });
        }

        items.sort_by(|left, right| {
            let ordering = match query.sort_by {
                UserSortBy::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
                UserSortBy::Email => left.email.cmp(&right.email),
                UserSortBy::Cpf => left.cpf.as_str().cmp(right.cpf.as_str()),
                UserSortBy::Role => left.role.as_str().cmp(right.role.as_str()),
                UserSortBy::CreatedAt => left.created_at.cmp(&right.created_at),
            }
            .then_with(|| left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.cmp(&right.id));

            query.order.apply(ordering)
        });

        Ok(paginate(items, query.page))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError> {
        self.mutate(|documents| {
            if let Some(email) = patch.email.as_deref()
                && documents
                    .user_with_email(email)
                    .is_some_and(|other| other.id != id)
            {
                return Err(DomainError::conflict("email already exists"));
            }
            if let Some(cpf) = patch.cpf.as_ref()
                && documents
                    .user_with_cpf(cpf)
                    .is_some_and(|other| other.id != id)
            {
                return Err(DomainError::conflict("cpf already exists"));
            }

            let Some(user) = documents.users.get_mut(&id) else {
                return Ok(None);
            };

            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(email) = patch.email {
                user.email = email;
            }
            if let Some(password_hash) = patch.password_hash {
                user.password_hash = password_hash;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
            if let Some(cpf) = patch.cpf {
                user.cpf = cpf;
            }
            user.updated_at = Utc::now();

            Ok(Some(user.clone()))
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.mutate(|documents| {
            if !documents.users.contains_key(&id) {
                return Ok(false);
            }
            if documents.is_referenced_by_sale(id) {
                return Err(DomainError::conflict(
                    "user is referenced by a recorded sale",
                ));
            }
            documents.users.remove(&id);
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, DomainError> {
        self.mutate(|documents| {
            let now = Utc::now();
            let created = Vehicle {
                id: Uuid::new_v4(),
                brand: vehicle.brand,
                model: vehicle.model,
                year: vehicle.year,
                color: vehicle.color,
                price: vehicle.price,
                image_url: vehicle.image_url,
                status: VehicleStatus::Disponivel,
                created_at: now,
                updated_at: now,
            };
            documents.vehicles.insert(created.id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        Ok(self.documents.read().await.vehicles.get(&id).cloned())
    }

    async fn list(&self, query: VehicleListQuery) -> Result<Page<Vehicle>, DomainError> {
        let mut items = self
            .documents
            .read()
            .await
            .vehicles
            .values()
            .filter(|vehicle| query.status.is_none_or(|status| vehicle.status == status))
            .filter(|vehicle| query.min_price.is_none_or(|min| vehicle.price >= min))
            .filter(|vehicle| query.max_price.is_none_or(|max| vehicle.price <= max))
            .cloned()
            .collect::<Vec<_>>();

        if let Some(search) = query.search.as_deref() {
            items.retain(|vehicle| {
                contains_ignore_case(&vehicle.brand, search)
                    || contains_ignore_case(&vehicle.model, search)
            });
        }

        items.sort_by(|left, right| {
            let ordering = match query.sort_by {
                VehicleSortBy::Brand => left.brand.to_lowercase().cmp(&right.brand.to_lowercase()),
                VehicleSortBy::Model => left.model.to_lowercase().cmp(&right.model.to_lowercase()),
                VehicleSortBy::Year => left.year.cmp(&right.year),
                VehicleSortBy::Color => left.color.to_lowercase().cmp(&right.color.to_lowercase()),
                VehicleSortBy::Price => left.price.total_cmp(&right.price),
                VehicleSortBy::Status => left.status.as_str().cmp(right.status.as_str()),
                VehicleSortBy::CreatedAt => left.created_at.cmp(&right.created_at),
            }
            .then_with(|| left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.cmp(&right.id));

            query.order.apply(ordering)
        });

        Ok(paginate(items, query.page))
    }

    async fn update(
        &self,
        id: Uuid,
        patch: VehiclePatch,
    ) -> Result<Option<Vehicle>, DomainError> {
        self.mutate(|documents| {
            let Some(vehicle) = documents.vehicles.get_mut(&id) else {
                return Ok(None);
            };

            if let Some(status) = patch.status
                && status != vehicle.status
            {
                return Err(DomainError::conflict(
                    "vehicle status changes only through a sale",
                ));
            }

            if let Some(brand) = patch.brand {
                vehicle.brand = brand;
            }
            if let Some(model) = patch.model {
                vehicle.model = model;
            }
            if let Some(year) = patch.year {
                vehicle.year = year;
            }
            if let Some(color) = patch.color {
                vehicle.color = color;
            }
            if let Some(price) = patch.price {
                vehicle.price = price;
            }
            if let Some(image_url) = patch.image_url {
                vehicle.image_url = image_url;
            }
            vehicle.updated_at = Utc::now();

            Ok(Some(vehicle.clone()))
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.mutate(|documents| {
            if !documents.vehicles.contains_key(&id) {
                return Ok(false);
            }
            if documents.is_referenced_by_sale(id) {
                return Err(DomainError::conflict(
                    "vehicle is referenced by a recorded sale",
                ));
            }
            documents.vehicles.remove(&id);
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl SaleRepository for InMemoryStore {
    async fn place(&self, sale: NewSale) -> Result<Sale, DomainError> {
        self.mutate(|documents| {
            let vehicle = documents
                .vehicles
                .get(&sale.vehicle_id)
                .ok_or_else(|| DomainError::not_found("vehicle not found"))?;
            if !vehicle.is_available() {
                return Err(DomainError::conflict("vehicle already sold"));
            }

            let client_id = documents
                .user_with_cpf(&sale.client_cpf)
                .filter(|user| user.role == Role::Cliente)
                .map(|user| user.id)
                .ok_or_else(|| DomainError::not_found("client not found"))?;
            let employee_id = documents
                .user_with_cpf(&sale.employee_cpf)
                .filter(|user| user.role.is_staff())
                .map(|user| user.id)
                .ok_or_else(|| DomainError::not_found("employee not found"))?;

            let vehicle = documents
                .vehicles
                .get_mut(&sale.vehicle_id)
                .ok_or_else(|| DomainError::not_found("vehicle not found"))?;
            let now = Utc::now();
            vehicle.status = VehicleStatus::Vendido;
            vehicle.updated_at = now;

            let recorded = Sale {
                id: Uuid::new_v4(),
                vehicle_id: sale.vehicle_id,
                client_id,
                employee_id,
                final_price: sale.final_price,
                sale_date: now,
            };
            documents.sales.insert(recorded.id, recorded.clone());
            Ok(recorded)
        })
        .await
    }

    async fn get_details(&self, id: Uuid) -> Result<Option<SaleDetails>, DomainError> {
        let documents = self.documents.read().await;
        documents
            .sales
            .get(&id)
            .map(|sale| documents.details(sale))
            .transpose()
    }

    async fn list(&self, query: SaleListQuery) -> Result<Page<SaleDetails>, DomainError> {
        let documents = self.documents.read().await;
        let mut items = documents
            .sales
            .values()
            .filter(|sale| query.min_price.is_none_or(|min| sale.final_price >= min))
            .filter(|sale| query.max_price.is_none_or(|max| sale.final_price <= max))
            .filter(|sale| {
                let day = sale.sale_date.date_naive();
                query.from.is_none_or(|from| day >= from) && query.to.is_none_or(|to| day <= to)
            })
            .map(|sale| documents.details(sale))
            .collect::<Result<Vec<_>, _>>()?;
        drop(documents);

        if let Some(cpf) = query.employee_cpf.as_ref() {
            items.retain(|details| &details.employee.cpf == cpf);
        }

        if let Some(search) = query.search.as_deref() {
            items.retain(|details| {
                contains_ignore_case(&details.client.name, search)
                    || contains_ignore_case(&details.employee.name, search)
                    || contains_ignore_case(&details.vehicle.brand, search)
                    || contains_ignore_case(&details.vehicle.model, search)
                    || contains_ignore_case(&details.sale.reference(), search)
            });
        }

        items.sort_by(|left, right| {
            let ordering = match query.sort_by {
                SaleSortBy::SaleDate => left.sale.sale_date.cmp(&right.sale.sale_date),
                SaleSortBy::FinalPrice => left.sale.final_price.total_cmp(&right.sale.final_price),
            }
            .then_with(|| left.sale.id.cmp(&right.sale.id));

            query.order.apply(ordering)
        });

        Ok(paginate(items, query.page))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::listing::PageRequest;

    fn new_user(name: &str, email: &str, cpf: &str, role: Role) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            cpf: Cpf::parse(cpf).unwrap(),
        }
    }

    fn new_vehicle(brand: &str, model: &str, price: f64) -> NewVehicle {
        NewVehicle {
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2022,
            color: "prata".to_string(),
            price,
            image_url: None,
        }
    }

    async fn seeded(store: &InMemoryStore) -> (User, User, Vehicle) {
        let client = UserRepository::create(
            store,
            new_user("Ana", "ana@mail.com", "11111111111", Role::Cliente),
        )
        .await
        .unwrap();
        let employee = UserRepository::create(
            store,
            new_user("Bruno", "bruno@loja.com", "22222222222", Role::Funcionario),
        )
        .await
        .unwrap();
        let vehicle = VehicleRepository::create(store, new_vehicle("Honda", "Civic", 120_000.0))
            .await
            .unwrap();
        (client, employee, vehicle)
    }

    fn sale_of(client: &User, employee: &User, vehicle: &Vehicle) -> NewSale {
        NewSale {
            vehicle_id: vehicle.id,
            client_cpf: client.cpf.clone(),
            employee_cpf: employee.cpf.clone(),
            final_price: 115_000.0,
        }
    }

    #[tokio::test]
    async fn placing_a_sale_marks_the_vehicle_sold() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;

        let sale = store.place(sale_of(&client, &employee, &vehicle)).await.unwrap();

        let vehicle = VehicleRepository::get_by_id(&store, vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Vendido);

        let details = store.get_details(sale.id).await.unwrap().unwrap();
        assert_eq!(details.client.name, "Ana");
        assert_eq!(details.employee.name, "Bruno");
        assert_eq!(details.vehicle.model, "Civic");
    }

    #[tokio::test]
    async fn second_sale_of_the_same_vehicle_conflicts() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;

        store.place(sale_of(&client, &employee, &vehicle)).await.unwrap();
        let second = store.place(sale_of(&client, &employee, &vehicle)).await;

        assert!(matches!(second, Err(DomainError::Conflict(_))));
        let page = SaleRepository::list(&store, SaleListQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn concurrent_sales_of_one_vehicle_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let (client, employee, vehicle) = seeded(&store).await;

        let attempts = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let sale = sale_of(&client, &employee, &vehicle);
                tokio::spawn(async move { store.place(sale).await })
            })
            .collect::<Vec<_>>();

        let mut successes = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn sale_of_unknown_vehicle_is_not_found() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;

        let result = store
            .place(NewSale {
                vehicle_id: Uuid::new_v4(),
                ..sale_of(&client, &employee, &vehicle)
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn sold_vehicle_is_reported_before_unknown_parties() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;
        store.place(sale_of(&client, &employee, &vehicle)).await.unwrap();

        let result = store
            .place(NewSale {
                client_cpf: Cpf::parse("99999999999").unwrap(),
                ..sale_of(&client, &employee, &vehicle)
            })
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Conflict(message)) if message == "vehicle already sold"
        ));
    }

    #[tokio::test]
    async fn parties_are_resolved_by_cpf_and_role() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;

        let client_as_seller = store
            .place(NewSale {
                employee_cpf: client.cpf.clone(),
                ..sale_of(&client, &employee, &vehicle)
            })
            .await;
        assert!(matches!(
            client_as_seller,
            Err(DomainError::NotFound(message)) if message == "employee not found"
        ));

        let staff_as_buyer = store
            .place(NewSale {
                client_cpf: employee.cpf.clone(),
                ..sale_of(&client, &employee, &vehicle)
            })
            .await;
        assert!(matches!(
            staff_as_buyer,
            Err(DomainError::NotFound(message)) if message == "client not found"
        ));

        let vehicle = VehicleRepository::get_by_id(&store, vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(vehicle.is_available());
    }

    #[tokio::test]
    async fn referenced_documents_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let (client, employee, vehicle) = seeded(&store).await;
        store.place(sale_of(&client, &employee, &vehicle)).await.unwrap();

        assert!(matches!(
            VehicleRepository::delete(&store, vehicle.id).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            UserRepository::delete(&store, client.id).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(!UserRepository::delete(&store, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn status_cannot_be_changed_by_update() {
        let store = InMemoryStore::new();
        let (_, _, vehicle) = seeded(&store).await;

        let result = VehicleRepository::update(
            &store,
            vehicle.id,
            VehiclePatch {
                status: Some(VehicleStatus::Vendido),
                ..VehiclePatch::default()
            },
        )
        .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let restated = VehicleRepository::update(
            &store,
            vehicle.id,
            VehiclePatch {
                status: Some(VehicleStatus::Disponivel),
                price: Some(99_000.0),
                ..VehiclePatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(restated.price, 99_000.0);
    }

    #[tokio::test]
    async fn duplicate_email_or_cpf_conflicts() {
        let store = InMemoryStore::new();
        seeded(&store).await;

        let same_email = UserRepository::create(
            &store,
            new_user("Outra", "ana@mail.com", "33333333333", Role::Cliente),
        )
        .await;
        let same_cpf = UserRepository::create(
            &store,
            new_user("Outra", "outra@mail.com", "11111111111", Role::Cliente),
        )
        .await;

        assert!(matches!(same_email, Err(DomainError::Conflict(_))));
        assert!(matches!(same_cpf, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn user_list_is_scoped_searched_and_sorted() {
        let store = InMemoryStore::new();
        seeded(&store).await;
        UserRepository::create(
            &store,
            new_user("Carla", "carla@mail.com", "44444444444", Role::Cliente),
        )
        .await
        .unwrap();

        let mut query = UserListQuery::new(crate::domain::user::UserScope::Clients);
        query.order = crate::domain::listing::SortOrder::Desc;
        let page = UserRepository::list(&store, query).await.unwrap();
        let names = page.items.iter().map(|u| u.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Carla", "Ana"]);

        let mut query = UserListQuery::new(crate::domain::user::UserScope::Clients);
        query.search = Some("4444".to_string());
        query.page = PageRequest::new(1, 1).unwrap();
        let page = UserRepository::list(&store, query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Carla");
    }

    #[tokio::test]
    async fn user_search_matches_punctuated_cpf() {
        let store = InMemoryStore::new();
        seeded(&store).await;

        let mut query = UserListQuery::new(crate::domain::user::UserScope::Clients);
        query.search = Some("111.111".to_string());
        let page = UserRepository::list(&store, query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Ana");

        let mut query = UserListQuery::new(crate::domain::user::UserScope::Staff);
        query.search = Some("222.222.222-22".to_string());
        let page = UserRepository::list(&store, query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Bruno");
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dealership.snapshot");

        {
            let store = InMemoryStore::open(&path).unwrap();
            let (client, employee, vehicle) = seeded(&store).await;
            store.place(sale_of(&client, &employee, &vehicle)).await.unwrap();
        }

        let reopened = InMemoryStore::open(&path).unwrap();
        let sales = SaleRepository::list(&reopened, SaleListQuery::default())
            .await
            .unwrap();
        assert_eq!(sales.total, 1);
        assert_eq!(sales.items[0].vehicle.brand, "Honda");
    }

    #[tokio::test]
    async fn failed_mutation_leaves_snapshot_and_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dealership.snapshot");
        let store = InMemoryStore::open(&path).unwrap();
        seeded(&store).await;

        let duplicate = UserRepository::create(
            &store,
            new_user("Ana 2", "ana@mail.com", "55555555555", Role::Cliente),
        )
        .await;
        assert!(duplicate.is_err());

        let reopened = InMemoryStore::open(&path).unwrap();
        let page = UserRepository::list(
            &reopened,
            UserListQuery::new(crate::domain::user::UserScope::Clients),
        )
        .await
        .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn failed_snapshot_write_keeps_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dealership.snapshot");
        let store = InMemoryStore::open(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let created = VehicleRepository::create(&store, new_vehicle("Fiat", "Uno", 30_000.0)).await;
        assert!(matches!(created, Err(DomainError::Storage(_))));

        let vehicles = VehicleRepository::list(&store, VehicleListQuery::default())
            .await
            .unwrap();
        assert_eq!(vehicles.total, 0);
    }
}
