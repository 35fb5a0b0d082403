use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use dotenv::dotenv;
use serde_json::json;
use sqlx::PgPool;
use taskboard::auth::{AuthMiddleware, TokenService};
use taskboard::routes;

const TEST_SECRET: &str = "taskboard-test-secret";
const DAY_SECONDS: i64 = 60 * 60 * 24;

async fn test_pool() -> Option<PgPool> {
    dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        }
    };
    Some(
        PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test DB"),
    )
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query(
        "DELETE FROM tasks WHERE author_id IN (SELECT id FROM users WHERE email = $1)",
    )
    .bind(email)
    .execute(pool)
    .await;
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> (i64, String) {
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(&json!({
            "email": email,
            "first_name": "Test",
            "last_name": "User",
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "Failed to register {}", email);
    let user: serde_json::Value = test::read_body_json(resp).await;
    let id = user["id"].as_i64().expect("registered user has an id");

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(&json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "Failed to login {}", email);
    let token = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    (id, token)
}

#[actix_rt::test]
async fn test_user_crud_flow() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let token_service = TokenService::new(TEST_SECRET, DAY_SECONDS);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(token_service, "/api"))
                    .configure(routes::config),
            ),
    )
    .await;

    let email = "user_crud@example.com";
    cleanup_user(&pool, email).await;

    let (user_id, token) = register_and_login(&app, email, "Password123!").await;

    // Listed
    let req = test::TestRequest::get()
        .uri("/api/users")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let users: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert!(users.iter().any(|u| u["id"].as_i64() == Some(user_id)));

    // Fetch by id
    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user_id))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let fetched: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fetched["email"], email);
    assert_eq!(fetched["first_name"], "Test");

    // Update own profile: first_name changes, id and email stay
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", user_id))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({
            "email": email,
            "first_name": "Renamed",
            "last_name": "User",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"].as_i64(), Some(user_id));
    assert_eq!(updated["first_name"], "Renamed");
    assert_eq!(updated["email"], email);

    // Unknown id -> 404
    let req = test::TestRequest::get()
        .uri("/api/users/999999999")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

    // Delete own account
    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", user_id))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);

    let gone = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(gone.is_none(), "Deleted user should be removed");
}

#[actix_rt::test]
async fn test_user_update_and_delete_are_self_only() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let token_service = TokenService::new(TEST_SECRET, DAY_SECONDS);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(token_service, "/api"))
                    .configure(routes::config),
            ),
    )
    .await;

    let email_a = "self_only_a@example.com";
    let email_b = "self_only_b@example.com";
    cleanup_user(&pool, email_a).await;
    cleanup_user(&pool, email_b).await;

    let (_id_a, token_a) = register_and_login(&app, email_a, "PasswordA123!").await;
    let (id_b, _token_b) = register_and_login(&app, email_b, "PasswordB123!").await;

    // A cannot update B's profile
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", id_b))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token_a)))
        .set_json(&json!({
            "email": email_b,
            "first_name": "Hijacked",
            "last_name": "User",
            "password": "PasswordB123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);

    // A cannot delete B's account
    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", id_b))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token_a)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);

    // B is untouched
    let still_there = sqlx::query_as::<_, (String,)>("SELECT first_name FROM users WHERE id = $1")
        .bind(id_b)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert_eq!(still_there.map(|r| r.0).as_deref(), Some("Test"));

    cleanup_user(&pool, email_a).await;
    cleanup_user(&pool, email_b).await;
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let token_service = TokenService::new(TEST_SECRET, DAY_SECONDS);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(token_service, "/api"))
                    .configure(routes::config),
            ),
    )
    .await;

    let test_cases = vec![
        // Deserialization errors (400 for missing fields)
        (
            json!({ "first_name": "No", "last_name": "Email", "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "no_password@example.com", "first_name": "No", "last_name": "Password" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (422 after successful deserialization)
        (
            json!({ "email": "invalid-email", "first_name": "Bad", "last_name": "Email", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "blank_name@example.com", "first_name": "   ", "last_name": "Blank", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "blank first name",
        ),
        (
            json!({ "email": "short_pw@example.com", "first_name": "Short", "last_name": "Password", "password": "12" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}
