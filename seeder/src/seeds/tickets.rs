use crate::seed::Seeder;
use db::feed::ChangeFeed;
use db::models::profile;
use db::models::tickets::TicketStatus;
use db::repositories::{Actor, ticket_repository::TicketRepository};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub struct TicketSeeder;

const SUBJECTS: [&str; 5] = [
    "Site is down",
    "Change homepage banner",
    "Invoice question",
    "New logo files",
    "Contact form not sending",
];

const OPENERS: [&str; 4] = [
    "Nothing loads since this morning.",
    "Could you take a look when possible?",
    "Attached the details in the last email.",
    "This is urgent for our launch.",
];

const REPLIES: [&str; 4] = [
    "Thanks, looking into it now.",
    "Fixed on our side, can you confirm?",
    "Any news on this?",
    "Still happening here.",
];

#[async_trait::async_trait]
impl Seeder for TicketSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let profiles = profile::Entity::find().all(db).await?;
        let (employees, clients): (Vec<_>, Vec<_>) =
            profiles.into_iter().partition(|p| p.is_employee());
        let Some(staff) = employees.first() else {
            return Err(DbErr::RecordNotFound("no employee to answer tickets".into()));
        };
        let staff = Actor::from(staff);

        let repo = TicketRepository::new(db.clone(), ChangeFeed::new());
        let statuses = [TicketStatus::Open, TicketStatus::InProgress, TicketStatus::Closed];

        for client in &clients {
            let client_actor = Actor::from(client);
            for _ in 0..fastrand::usize(1..=3) {
                let subject = SUBJECTS[fastrand::usize(..SUBJECTS.len())];
                let opener = OPENERS[fastrand::usize(..OPENERS.len())];
                let ticket = repo
                    .create_ticket(subject, opener, client.id, client.id)
                    .await?;

                for turn in 0..fastrand::usize(0..4) {
                    let author = if turn % 2 == 0 { &staff } else { &client_actor };
                    let reply = REPLIES[fastrand::usize(..REPLIES.len())];
                    repo.append_message(author, ticket.id, reply).await?;
                }

                let status = statuses[fastrand::usize(..statuses.len())];
                repo.set_status(&staff, ticket.id, status).await?;
            }
        }
        Ok(())
    }
}
