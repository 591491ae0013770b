#[cfg(test)]
mod tests {
    use crate::helpers::{
        connect_ws, drain_events, make_test_app, next_event, send_json, spawn_server, token_for,
    };
    use db::models::profile::{Model as ProfileModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use services::ticket_service::NewTicket;
    use tokio::time::Duration;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::{Error, client::IntoClientRequest};

    struct TestData {
        carla: ProfileModel,
        edu: ProfileModel,
    }

    async fn setup(db: &sea_orm::DatabaseConnection) -> TestData {
        TestData {
            carla: ProfileModel::create(db, "Carla", "carla@client.com", "pw", Role::Client, None)
                .await
                .unwrap(),
            edu: ProfileModel::create(db, "Eduardo", "edu@agency.com", "pw", Role::Employee, None)
                .await
                .unwrap(),
        }
    }

    fn site_down() -> NewTicket {
        NewTicket {
            subject: "Site down".into(),
            message: "Nothing loads".into(),
            client_id: None,
        }
    }

    #[tokio::test]
    #[serial]
    async fn unauthenticated_socket_is_rejected() {
        let (app, _) = make_test_app().await;
        let addr = spawn_server(app).await;

        let req = format!("ws://{addr}/ws/session").into_client_request().unwrap();
        match connect_async(req).await {
            Ok(_) => panic!("Unauthenticated user should not connect"),
            Err(Error::Http(resp)) => {
                assert_eq!(resp.status(), 401);
                let body = std::str::from_utf8(resp.body().as_ref().unwrap()).unwrap();
                let json: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(json["message"], "Authentication required");
            }
            Err(e) => panic!("Unexpected error: {e:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn session_starts_with_ready_and_ticket_list() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        state
            .tickets()
            .create_ticket(&(&data.carla).into(), site_down())
            .await
            .unwrap();
        let addr = spawn_server(app).await;

        let (mut ws, _) = connect_ws(&addr, "session", &token_for(&data.carla))
            .await
            .unwrap();
        let ready = next_event(&mut ws, "session.ready").await;
        assert_eq!(ready["payload"]["user"]["email"], "carla@client.com");
        assert_eq!(ready["payload"]["unread"], 0);

        let list = next_event(&mut ws, "tickets.list").await;
        assert_eq!(list["payload"]["tickets"][0]["subject"], "Site down");
    }

    #[tokio::test]
    #[serial]
    async fn new_ticket_alerts_employees() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        let addr = spawn_server(app).await;

        let (mut ws, _) = connect_ws(&addr, "session", &token_for(&data.edu))
            .await
            .unwrap();
        next_event(&mut ws, "tickets.list").await;

        let ticket = state
            .tickets()
            .create_ticket(&(&data.carla).into(), site_down())
            .await
            .unwrap();

        // The ticket and its first message each raise an alert.
        let toast = next_event(&mut ws, "toast.shown").await;
        assert_eq!(toast["payload"]["title"], "Novo Ticket!");
        assert_eq!(toast["payload"]["message"], "Assunto: Site down");

        let cue = next_event(&mut ws, "cue.play").await;
        assert_eq!(cue["payload"]["frequency_hz"], 440.0);
        assert_eq!(cue["payload"]["duration_ms"], 500);

        let activity = next_event(&mut ws, "activity").await;
        assert_eq!(activity["payload"]["has_new_activity"], true);

        let toast = next_event(&mut ws, "toast.shown").await;
        assert_eq!(toast["payload"]["title"], "Nova Mensagem!");
        assert_eq!(
            toast["payload"]["message"],
            format!("Nova mensagem no ticket #{}", ticket.id)
        );
        next_event(&mut ws, "cue.play").await;
        let activity = next_event(&mut ws, "activity").await;
        assert_eq!(activity["payload"]["has_new_activity"], true);

        send_json(&mut ws, json!({ "type": "view_tickets" })).await;
        let activity = next_event(&mut ws, "activity").await;
        assert_eq!(activity["payload"]["has_new_activity"], false);
        assert_eq!(activity["payload"]["unread"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn sender_sees_own_message_without_a_toast() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        let ticket = state
            .tickets()
            .create_ticket(&(&data.carla).into(), site_down())
            .await
            .unwrap();
        let addr = spawn_server(app).await;

        let (mut carla_ws, _) = connect_ws(&addr, "session", &token_for(&data.carla))
            .await
            .unwrap();
        let (mut edu_ws, _) = connect_ws(&addr, "session", &token_for(&data.edu))
            .await
            .unwrap();
        next_event(&mut carla_ws, "tickets.list").await;
        next_event(&mut edu_ws, "tickets.list").await;

        send_json(&mut carla_ws, json!({ "type": "open_ticket", "ticket_id": ticket.id })).await;
        let view = next_event(&mut carla_ws, "ticket.view").await;
        assert_eq!(view["payload"]["phase"], "ready");
        assert_eq!(view["payload"]["can_change_status"], false);

        send_json(&mut carla_ws, json!({ "type": "send_message", "content": "Any news?" })).await;
        let view = next_event(&mut carla_ws, "ticket.view").await;
        let messages = view["payload"]["ticket"]["messages"].as_array().unwrap();
        assert_eq!(messages.last().unwrap()["content"], "Any news?");
        assert_eq!(view["payload"]["draft"], "");

        let toast = next_event(&mut edu_ws, "toast.shown").await;
        assert_eq!(
            toast["payload"]["message"],
            format!("Nova mensagem no ticket #{}", ticket.id)
        );

        let seen = drain_events(&mut carla_ws, Duration::from_millis(300)).await;
        assert!(!seen.iter().any(|e| e == "toast.shown"), "sender was alerted: {seen:?}");
    }

    #[tokio::test]
    #[serial]
    async fn status_change_is_applied_then_confirmed() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        let ticket = state
            .tickets()
            .create_ticket(&(&data.carla).into(), site_down())
            .await
            .unwrap();
        let addr = spawn_server(app).await;

        let (mut ws, _) = connect_ws(&addr, "session", &token_for(&data.edu))
            .await
            .unwrap();
        next_event(&mut ws, "tickets.list").await;
        send_json(&mut ws, json!({ "type": "open_ticket", "ticket_id": ticket.id })).await;
        next_event(&mut ws, "ticket.view").await;

        send_json(&mut ws, json!({ "type": "change_status", "status": "Fechado" })).await;
        let applying = next_event(&mut ws, "ticket.status").await;
        assert_eq!(applying["payload"]["outcome"], "applying");
        assert_eq!(applying["payload"]["status"], "Fechado");

        let settled = next_event(&mut ws, "ticket.status").await;
        assert_eq!(settled["payload"]["outcome"], "confirmed");

        let stored = state
            .tickets()
            .get_ticket(&(&data.edu).into(), ticket.id)
            .await
            .unwrap();
        assert!(stored.ticket.status.to_string() == "Fechado");
    }

    #[tokio::test]
    #[serial]
    async fn clients_cannot_change_status() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        let ticket = state
            .tickets()
            .create_ticket(&(&data.carla).into(), site_down())
            .await
            .unwrap();
        let addr = spawn_server(app).await;

        let (mut ws, _) = connect_ws(&addr, "session", &token_for(&data.carla))
            .await
            .unwrap();
        send_json(&mut ws, json!({ "type": "open_ticket", "ticket_id": ticket.id })).await;
        next_event(&mut ws, "ticket.view").await;

        send_json(&mut ws, json!({ "type": "change_status", "status": "Fechado" })).await;
        let error = next_event(&mut ws, "error").await;
        assert_eq!(
            error["payload"]["message"],
            "You are not allowed to change ticket status"
        );
        assert_eq!(error["payload"]["blocking"], false);
    }

    #[tokio::test]
    #[serial]
    async fn sign_out_ends_the_session() {
        let (app, state) = make_test_app().await;
        let data = setup(state.db()).await;
        let addr = spawn_server(app).await;

        let (mut ws, _) = connect_ws(&addr, "session", &token_for(&data.carla))
            .await
            .unwrap();
        next_event(&mut ws, "session.ready").await;
        send_json(&mut ws, json!({ "type": "sign_out" })).await;
        next_event(&mut ws, "session.ended").await;
    }
}
