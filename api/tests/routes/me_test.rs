#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, make_test_app, token_for};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use db::models::profile::{Model as ProfileModel, Role};
    use db::models::tickets::TicketStatus;
    use serial_test::serial;
    use services::ticket_service::NewTicket;
    use tower::ServiceExt;

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn me_requires_authentication() {
        let (app, _) = make_test_app().await;
        let req = Request::builder().uri("/api/me").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    #[serial]
    async fn me_returns_the_profile() {
        let (app, state) = make_test_app().await;
        let carla = ProfileModel::create(
            state.db(),
            "Carla",
            "carla@client.com",
            "secret1",
            Role::Client,
            Some("Padaria Souza"),
        )
        .await
        .unwrap();

        let response = app
            .oneshot(authed("GET", "/api/me", &token_for(&carla)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["email"], "carla@client.com");
        assert_eq!(json["data"]["company"], "Padaria Souza");
        assert!(json["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn unread_counts_updates_since_last_check() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let carla = ProfileModel::create(db, "Carla", "carla@client.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let edu = ProfileModel::create(db, "Eduardo", "edu@agency.com", "pw", Role::Employee, None)
            .await
            .unwrap();
        let token = token_for(&carla);

        let ticket = state
            .tickets()
            .create_ticket(
                &(&carla).into(),
                NewTicket {
                    subject: "Site down".into(),
                    message: "Nothing loads".into(),
                    client_id: None,
                },
            )
            .await
            .unwrap();

        // Never checked: nothing is unread.
        let json = body_json(
            app.clone()
                .oneshot(authed("GET", "/api/me/unread", &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json["data"]["count"], 0);

        let response = app
            .clone()
            .oneshot(authed("POST", "/api/me/unread/checked", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["data"]["checked_at"].is_string());

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        state
            .tickets()
            .set_status(&(&edu).into(), ticket.id, TicketStatus::InProgress)
            .await
            .unwrap();

        let json = body_json(
            app.oneshot(authed("GET", "/api/me/unread", &token))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json["data"]["count"], 1);
    }
}
