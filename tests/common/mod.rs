#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use places_api::api::routes::place_routes;
use places_api::domain::entities::{Amenity, City, Place, Record, State, User};
use places_api::domain::repositories::Storage;
use places_api::infrastructure::persistence::FileStorage;
use places_api::state::AppState;
use std::sync::Arc;

/// Ids of the objects stored by [`seed`].
///
/// ```text
/// California: San Francisco (loft: wifi+pool, studio: wifi)
///             Los Angeles   (villa: wifi+pool+ac)
///             Fresno        (no places)
/// Nevada:     Reno          (cabin: pool)
/// ```
pub struct Fixture {
    pub california: String,
    pub nevada: String,
    pub san_francisco: String,
    pub los_angeles: String,
    pub fresno: String,
    pub reno: String,
    pub owner: String,
    pub wifi: String,
    pub pool: String,
    pub ac: String,
    pub loft: String,
    pub studio: String,
    pub villa: String,
    pub cabin: String,
}

fn place(city: &City, user: &User, name: &str, amenities: &[&Amenity]) -> Place {
    let mut p = Place::new(&city.id, &user.id, name);
    p.amenity_ids = amenities.iter().map(|a| a.id.clone()).collect();
    p
}

pub async fn seed(storage: &FileStorage) -> Fixture {
    let california = State::new("California");
    let nevada = State::new("Nevada");
    let san_francisco = City::new(&california.id, "San Francisco");
    let los_angeles = City::new(&california.id, "Los Angeles");
    let fresno = City::new(&california.id, "Fresno");
    let reno = City::new(&nevada.id, "Reno");
    let owner = User::new("owner@example.com", "secret", Some("Ada".into()), None);
    let wifi = Amenity::new("Wifi");
    let pool = Amenity::new("Pool");
    let ac = Amenity::new("Air conditioning");

    let loft = place(&san_francisco, &owner, "Loft", &[&wifi, &pool]);
    let studio = place(&san_francisco, &owner, "Studio", &[&wifi]);
    let villa = place(&los_angeles, &owner, "Villa", &[&wifi, &pool, &ac]);
    let cabin = place(&reno, &owner, "Cabin", &[&pool]);

    let fixture = Fixture {
        california: california.id.clone(),
        nevada: nevada.id.clone(),
        san_francisco: san_francisco.id.clone(),
        los_angeles: los_angeles.id.clone(),
        fresno: fresno.id.clone(),
        reno: reno.id.clone(),
        owner: owner.id.clone(),
        wifi: wifi.id.clone(),
        pool: pool.id.clone(),
        ac: ac.id.clone(),
        loft: loft.id.clone(),
        studio: studio.id.clone(),
        villa: villa.id.clone(),
        cabin: cabin.id.clone(),
    };

    let records: Vec<Record> = vec![
        california.into(),
        nevada.into(),
        san_francisco.into(),
        los_angeles.into(),
        fresno.into(),
        reno.into(),
        owner.into(),
        wifi.into(),
        pool.into(),
        ac.into(),
        loft.into(),
        studio.into(),
        villa.into(),
        cabin.into(),
    ];
    for record in records {
        storage.put(record).await.unwrap();
    }
    storage.save().await.unwrap();

    fixture
}

pub fn create_test_state(storage: Arc<FileStorage>) -> AppState {
    AppState::new(storage)
}

/// Seeded in-memory storage plus a test server over the place routes.
pub async fn make_server() -> (TestServer, Arc<FileStorage>, Fixture) {
    let storage = Arc::new(FileStorage::in_memory());
    let fixture = seed(&storage).await;

    let app = Router::new()
        .nest("/api/v1", place_routes())
        .with_state(create_test_state(storage.clone()));

    (TestServer::new(app).unwrap(), storage, fixture)
}

/// Sorted `name` fields of a JSON array of places.
pub fn names(body: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
