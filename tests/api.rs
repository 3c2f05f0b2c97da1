use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use moviedb::{
    AppState,
    catalog::CatalogService,
    config::Config,
    db,
    models::{ActorInput, NewMovie},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const MOVIES: [(&str, &str, i32); 8] = [
    ("tt0111161", "The Shawshank Redemption", 1994),
    ("tt0068646", "The Godfather", 1972),
    ("tt1375666", "Inception", 2010),
    ("tt0108052", "Schindler's List", 1993),
    ("tt0167260", "The Lord of the Rings: The Return of the King", 2003),
    ("tt0080684", "Star Wars: Episode V - The Empire Strikes Back", 1980),
    ("tt0137523", "Fight Club", 1999),
    ("tt0120737", "The Lord of the Rings: The Fellowship of the Ring", 2001),
];

const ACTORS: [&str; 8] = [
    "Tim Robbins",
    "Morgan Freeman",
    "Leonardo DiCaprio",
    "Liam Neeson",
    "Viggo Mortensen",
    "Mark Hamill",
    "Brad Pitt",
    "Elijah Wood",
];

/// Router over a fresh in-memory catalog; movie `i` casts actor `i`.
async fn app() -> (Router, Vec<i32>) {
    let db = db::connect_and_migrate("sqlite::memory:", 1).await.expect("in-memory db");
    let catalog = CatalogService::new(db);

    let mut actor_ids = Vec::new();
    for name in ACTORS {
        let actor = catalog
            .create_actor(ActorInput { name: name.to_string(), birthdate: None })
            .await
            .expect("seed actor");
        actor_ids.push(actor.id);
    }

    for (i, (id, title, year)) in MOVIES.into_iter().enumerate() {
        catalog
            .create_movie(NewMovie {
                id: id.to_string(),
                title: title.to_string(),
                release_year: year,
                description: format!("About {title}"),
                pictures: vec![format!("http://example.com/{id}.jpg")],
                cast: vec![actor_ids[i]],
            })
            .await
            .expect("seed movie");
    }

    let config = Arc::new(Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
    });
    let state = Arc::new(AppState { config, catalog });
    (moviedb::router(state), actor_ids)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            req = req.header("content-type", "application/json");
            Body::from(value.to_string())
        },
        None => Body::empty(),
    };

    let response = app.clone().oneshot(req.body(body).expect("request")).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

fn assert_error_shape(body: &Value) {
    assert!(body["message"].is_string(), "missing message in {body}");
    assert!(body["errors"].is_array(), "missing errors in {body}");
}

#[tokio::test]
async fn lists_all_movies_without_paging() {
    let (app, _) = app().await;
    let (status, body) = send(&app, "GET", "/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 8);
}

#[tokio::test]
async fn paginates_movies() {
    let (app, _) = app().await;

    let (status, body) = send(&app, "GET", "/movies?page=1&size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().expect("items").len(), 5);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["pageSize"], 5);
    assert_eq!(body["totalItems"], 8);
    assert_eq!(body["totalPages"], 2);

    let (status, body) = send(&app, "GET", "/movies?page=2&size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().expect("items").len(), 3);
    assert_eq!(body["currentPage"], 2);

    let (_, body) = send(&app, "GET", "/movies?page=1&size=1000", None).await;
    assert_eq!(body["pageSize"], 100);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn rejects_bad_paging() {
    let (app, _) = app().await;

    let (status, body) = send(&app, "GET", "/movies?page=0&size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "page and size parameters must be positive integers");
    assert_eq!(body["errors"], json!([]));

    let (status, body) = send(&app, "GET", "/movies?page=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "both page and size parameters must be provided together");

    let (status, body) = send(&app, "GET", "/movies?page=one&size=5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_shape(&body);
}

#[tokio::test]
async fn creates_and_fetches_movie() {
    let (app, actors) = app().await;
    let payload = json!({
        "id": "tt1234567",
        "title": "Test Movie",
        "releaseYear": 2024,
        "description": "A test movie description.",
        "pictures": ["http://example.com/testmovie.jpg"],
        "cast": [actors[0], actors[1]],
    });

    let (status, created) = send(&app, "POST", "/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "tt1234567");
    assert_eq!(created["cast"].as_array().expect("cast").len(), 2);

    let (status, fetched) = send(&app, "GET", "/movies/tt1234567", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["releaseYear"], 2024);
    assert_eq!(fetched["pictures"], json!(["http://example.com/testmovie.jpg"]));
    let names: Vec<&str> = fetched["cast"]
        .as_array()
        .expect("cast")
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert!(names.contains(&"Tim Robbins"));
    assert!(names.contains(&"Morgan Freeman"));
}

#[tokio::test]
async fn duplicate_movie_id_conflicts() {
    let (app, _) = app().await;
    let payload = json!({
        "imdbID": "tt0111161",
        "title": "Again",
        "releaseYear": 1994,
        "description": "Duplicate",
    });

    let (status, body) = send(&app, "POST", "/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_shape(&body);

    let (_, original) = send(&app, "GET", "/movies/tt0111161", None).await;
    assert_eq!(original["title"], "The Shawshank Redemption");
}

#[tokio::test]
async fn blank_fields_are_listed() {
    let (app, actors) = app().await;
    let payload = json!({
        "id": "",
        "title": "",
        "releaseYear": 2024,
        "description": "",
        "cast": [actors[0]],
    });

    let (status, body) = send(&app, "POST", "/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!(["id cannot be blank", "title cannot be blank", "description cannot be blank"])
    );

    let (status, body) = send(&app, "POST", "/actors", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["name cannot be blank"]));
}

#[tokio::test]
async fn null_cast_and_pictures_mean_none() {
    let (app, _) = app().await;
    let payload = json!({
        "id": "tt0000042",
        "title": "Empty Stage",
        "releaseYear": 2024,
        "description": "No one appears",
        "pictures": null,
        "cast": null,
    });

    let (status, body) = send(&app, "POST", "/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cast"], json!([]));
    assert_eq!(body["pictures"], json!([]));

    let update = json!({ "title": "Empty Stage", "description": "Still empty", "cast": null });
    let (status, body) = send(&app, "PUT", "/movies/tt0000042", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cast"], json!([]));
}

#[tokio::test]
async fn huge_page_number_is_an_empty_page() {
    let (app, _) = app().await;
    let uri = format!("/movies?page={}&size=100", i64::MAX);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalItems"], 8);
}

#[tokio::test]
async fn unknown_cast_member_rejects_write() {
    let (app, actors) = app().await;
    let payload = json!({
        "id": "tt7654321",
        "title": "Ghosts",
        "releaseYear": 2024,
        "description": "Nobody here",
        "cast": [actors[0], 9999],
    });

    let (status, body) = send(&app, "POST", "/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "one or more actors not found");
    assert_eq!(body["errors"], json!(["actor 9999 does not exist"]));

    let (status, _) = send(&app, "GET", "/movies/tt7654321", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let update = json!({
        "title": "Changed",
        "releaseYear": 1972,
        "description": "Changed",
        "cast": [9999],
    });
    let (status, _) = send(&app, "PUT", "/movies/tt0068646", Some(update)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, unchanged) = send(&app, "GET", "/movies/tt0068646", None).await;
    assert_eq!(unchanged["title"], "The Godfather");
}

#[tokio::test]
async fn updates_and_deletes_movie() {
    let (app, actors) = app().await;
    let update = json!({
        "title": "The Shawshank Redemption - Updated",
        "releaseYear": 1995,
        "description": "Updated",
        "pictures": [],
        "cast": [actors[2]],
    });

    let (status, body) = send(&app, "PUT", "/movies/tt0111161", Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "tt0111161");
    assert_eq!(body["releaseYear"], 1995);
    assert_eq!(body["cast"][0]["name"], "Leonardo DiCaprio");

    let (status, body) = send(&app, "DELETE", "/movies/tt0111161", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/movies/tt0111161", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "movie not found: tt0111161");

    let (status, _) = send(&app, "PUT", "/movies/tt0111161", Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn searches_by_title_and_year() {
    let (app, _) = app().await;

    let (_, body) = send(&app, "GET", "/movies/search?title=Godfather&year=1972", None).await;
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["id"], "tt0068646");

    let (_, body) = send(&app, "GET", "/movies/search?title=Lord%20of%20the%20Rings", None).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let (_, body) = send(&app, "GET", "/movies/search?year=2010", None).await;
    assert_eq!(body[0]["title"], "Inception");

    let (_, body) = send(&app, "GET", "/movies/search", None).await;
    assert_eq!(body.as_array().expect("array").len(), 8);
}

#[tokio::test]
async fn actor_lifecycle() {
    let (app, _) = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/actors",
        Some(json!({ "name": "Keanu Reeves", "birthdate": "1964-09-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["birthdate"], "1964-09-02");
    let uri = format!("/actors/{}", created["id"]);

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) =
        send(&app, "PUT", &uri, Some(json!({ "name": "K. Reeves", "birthdate": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "K. Reeves");
    assert_eq!(updated["birthdate"], Value::Null);

    let (_, all) = send(&app, "GET", "/actors", None).await;
    assert_eq!(all.as_array().expect("array").len(), 9);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_shape(&body);
}

#[tokio::test]
async fn referenced_actor_is_protected() {
    let (app, actors) = app().await;
    let uri = format!("/actors/{}", actors[0]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "cannot delete actor associated with movies");

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, movies) = send(&app, "GET", &format!("{uri}/movies"), None).await;
    assert_eq!(movies[0]["id"], "tt0111161");
}

#[tokio::test]
async fn malformed_requests_use_error_payload() {
    let (app, _) = app().await;

    let (status, body) = send(&app, "GET", "/actors/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_shape(&body);

    let (status, body) = send(&app, "POST", "/actors", Some(json!({ "name": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_shape(&body);

    let (status, body) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_shape(&body);
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
