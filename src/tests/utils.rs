use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::domain::Listing;
use crate::geo::GeoPoint;
use crate::state::AppState;
use crate::store::ShiftStore;
use astra::{Body, Request, Response};
use chrono::{NaiveDate, NaiveTime};
use http::Method;
use rusqlite::params;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// In-memory listing with plausible defaults at `(lat, lon)`.
pub fn listing_at(id: i64, lat: f64, lon: f64) -> Listing {
    Listing {
        id,
        location: GeoPoint::new(lat, lon).expect("test coordinate in range"),
        company_name: format!("Company {id}"),
        address: format!("Street {id}"),
        work_type_name: "Loader".to_string(),
        customer_rating: 4.5,
        customer_feedbacks_count: 12,
        current_workers: 1,
        plan_workers: 3,
        date_start: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        time_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        price_worker: 2500.0,
        logo: None,
    }
}

/// Temporary database + image directory, removed on drop.
pub struct Fixture {
    _dir: TempDir,
    pub db: Database,
    pub images_dir: PathBuf,
    pub config: Config,
    pub store: Arc<ShiftStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let images_dir = dir.path().join("images");
        std::fs::create_dir_all(&images_dir).expect("images dir");

        let config = Config {
            database_path: dir.path().join("work.sqlite"),
            images_dir: images_dir.clone(),
            catchment_radius_m: 5_000.0,
            reload_interval: None,
            ..Config::default()
        };

        let db = Database::new(&config.database_path);
        init_db(&db).expect("Failed to initialize DB");

        Self {
            _dir: dir,
            db,
            images_dir,
            store: Arc::new(ShiftStore::new(config.grid_cell_deg)),
            config,
        }
    }

    pub fn insert(&self, id: i64, lat: f64, lon: f64, logo: Option<&str>) {
        self.db
            .with_conn(|conn| {
                conn.execute(
                    r#"
                    insert into shifts (
                        id, latitude, longitude, company_name, address, work_type_name,
                        customer_rating, customer_feedbacks_count, current_workers, plan_workers,
                        date_start, time_start, time_end, price_worker, logo
                    ) values (?1, ?2, ?3, ?4, 'Tverskaya 1', 'Loader',
                              4.8, 31, 2, 5, '2024-05-17', '22:00', '06:00', 3100.5, ?5)
                    "#,
                    params![id, lat, lon, format!("Company {id}"), logo],
                )?;
                Ok(())
            })
            .expect("insert shift");
    }

    pub fn write_image(&self, name: &str, bytes: &[u8]) {
        std::fs::write(self.images_dir.join(name), bytes).expect("write image");
    }

    pub fn load(&self) {
        self.store.reload(&self.db).expect("reload store");
    }

    pub fn state(&self) -> AppState {
        AppState::build(&self.config, Arc::clone(&self.store)).expect("app state")
    }

    pub fn state_with(&self, tweak: impl FnOnce(&mut Config)) -> AppState {
        let mut config = self.config.clone();
        tweak(&mut config);
        AppState::build(&config, Arc::clone(&self.store)).expect("app state")
    }
}

pub fn request(method: Method, uri: &str, body: &str) -> Request {
    let mut req = Request::new(Body::from(body.to_string()));
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn post_getworks(body: &str) -> Request {
    let mut req = request(Method::POST, "/getworks", body);
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    req
}

pub fn read_body(resp: &mut Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn read_json(resp: &mut Response) -> serde_json::Value {
    serde_json::from_slice(&read_body(resp)).expect("response body is JSON")
}

pub fn header<'a>(resp: &'a Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Route a request the way the server loop does, errors included.
pub fn send(req: Request, state: &AppState) -> Response {
    match crate::router::handle(req, state) {
        Ok(resp) => resp,
        Err(err) => crate::responses::error_to_response(err),
    }
}
