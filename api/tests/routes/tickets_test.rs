#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, make_test_app, token_for};
    use axum::{
        Router,
        body::Body,
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
    };
    use db::models::profile::{Model as ProfileModel, Role};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    struct TestData {
        carla: ProfileModel,
        bruno: ProfileModel,
        edu: ProfileModel,
    }

    async fn setup(state: &util::state::AppState) -> TestData {
        let db = state.db();
        TestData {
            carla: ProfileModel::create(db, "Carla Souza", "carla@client.com", "pw", Role::Client, None)
                .await
                .unwrap(),
            bruno: ProfileModel::create(db, "Bruno Lima", "bruno@client.com", "pw", Role::Client, None)
                .await
                .unwrap(),
            edu: ProfileModel::create(db, "Eduardo", "edu@agency.com", "pw", Role::Employee, None)
                .await
                .unwrap(),
        }
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        who: &ProfileModel,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", token_for(who)));
        let req = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn open_ticket(app: &Router, who: &ProfileModel, subject: &str) -> i64 {
        let (status, json) = call(
            app,
            "POST",
            "/api/tickets",
            who,
            Some(json!({ "subject": subject, "message": "Nothing loads" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn client_opens_a_ticket_with_its_first_message() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/tickets",
            &data.carla,
            Some(json!({ "subject": "Site down", "message": "Nothing loads" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "Aberto");
        assert_eq!(json["data"]["client_name"], "Carla Souza");
        assert_eq!(json["data"]["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["messages"][0]["author_id"], data.carla.id);
    }

    #[tokio::test]
    #[serial]
    async fn blank_subject_is_rejected() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/tickets",
            &data.carla,
            Some(json!({ "subject": "  ", "message": "Nothing loads" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn clients_only_see_their_own_tickets() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;
        let carlas = open_ticket(&app, &data.carla, "Site down").await;
        open_ticket(&app, &data.bruno, "New logo").await;

        let (_, json) = call(&app, "GET", "/api/tickets", &data.carla, None).await;
        let tickets = json["data"].as_array().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0]["id"], carlas);

        let (status, _) = call(
            &app,
            "GET",
            &format!("/api/tickets/{carlas}"),
            &data.bruno,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = call(&app, "GET", "/api/tickets", &data.edu, None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn replying_moves_the_ticket_in_progress() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;
        let id = open_ticket(&app, &data.carla, "Site down").await;

        let (status, json) = call(
            &app,
            "POST",
            &format!("/api/tickets/{id}/messages"),
            &data.edu,
            Some(json!({ "content": "Looking into it" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["author_id"], data.edu.id);

        let (_, json) = call(&app, "GET", &format!("/api/tickets/{id}"), &data.carla, None).await;
        assert_eq!(json["data"]["status"], "Em Andamento");
        let messages = json["data"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["author_name"], "Eduardo");

        let (_, json) = call(
            &app,
            "GET",
            "/api/tickets?status=Em%20Andamento",
            &data.edu,
            None,
        )
        .await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = call(&app, "GET", "/api/tickets?status=Aberto", &data.edu, None).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn only_employees_change_status() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;
        let id = open_ticket(&app, &data.carla, "Site down").await;
        let uri = format!("/api/tickets/{id}/status");

        let (status, _) = call(&app, "PUT", &uri, &data.carla, Some(json!({ "status": "Fechado" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = call(&app, "PUT", &uri, &data.edu, Some(json!({ "status": "Fechado" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "Fechado");
    }

    #[tokio::test]
    #[serial]
    async fn employees_open_tickets_for_named_clients() {
        let (app, state) = make_test_app().await;
        let data = setup(&state).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/tickets",
            &data.edu,
            Some(json!({ "subject": "Setup", "message": "Kickoff" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = call(
            &app,
            "POST",
            "/api/tickets",
            &data.edu,
            Some(json!({ "subject": "Setup", "message": "Kickoff", "client_id": data.bruno.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["client_id"], data.bruno.id);
    }
}
