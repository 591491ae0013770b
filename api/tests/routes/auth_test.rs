#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use db::models::profile::{Model as ProfileModel, Role};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn register_creates_a_signed_in_client() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(post(
                "/api/auth/register",
                json!({
                    "name": "Carla Souza",
                    "email": "carla@client.com",
                    "password": "secret1",
                    "company": "Padaria Souza"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["user"]["role"], "client");
        assert_eq!(json["data"]["user"]["company"], "Padaria Souza");
        assert!(!json["data"]["token"].as_str().unwrap().is_empty());
        assert!(json["data"]["expires_at"].is_string());
    }

    #[tokio::test]
    #[serial]
    async fn register_rejects_duplicates_and_bad_input() {
        let (app, state) = make_test_app().await;
        ProfileModel::create(state.db(), "Carla", "carla@client.com", "secret1", Role::Client, None)
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post(
                "/api/auth/register",
                json!({ "name": "Other", "email": "carla@client.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Email already registered");

        let response = app
            .oneshot(post(
                "/api/auth/register",
                json!({ "name": "Other", "email": "not-an-email", "password": "123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn login_checks_credentials() {
        let (app, state) = make_test_app().await;
        ProfileModel::create(state.db(), "Eduardo", "edu@agency.com", "secret1", Role::Employee, None)
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post(
                "/api/auth/login",
                json!({ "email": "edu@agency.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["user"]["role"], "employee");

        let response = app
            .oneshot(post(
                "/api/auth/login",
                json!({ "email": "edu@agency.com", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid email or password");
    }

    #[tokio::test]
    #[serial]
    async fn logout_requires_a_token() {
        let (app, _) = make_test_app().await;
        let response = app
            .oneshot(post("/api/auth/logout", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
