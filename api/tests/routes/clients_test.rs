#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, make_test_app, token_for};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use db::models::profile::{Model as ProfileModel, Role};
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn client_directory_is_for_employees() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let carla = ProfileModel::create(db, "Carla", "carla@client.com", "pw", Role::Client, None)
            .await
            .unwrap();
        let edu = ProfileModel::create(db, "Eduardo", "edu@agency.com", "pw", Role::Employee, None)
            .await
            .unwrap();

        let req = |token: String| {
            Request::builder()
                .uri("/api/clients")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(req(token_for(&carla))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["message"], "Employees only");

        let response = app.oneshot(req(token_for(&edu))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let clients = json["data"].as_array().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0]["id"], carla.id);
    }
}
