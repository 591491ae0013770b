use crate::seed::Seeder;
use db::models::profile::{Model, Role};
use fake::{
    Fake,
    faker::{company::en::CompanyName, internet::en::SafeEmail, name::en::Name},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct ProfileSeeder;

#[async_trait::async_trait]
impl Seeder for ProfileSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed staff and client logins
        if Model::find_by_email(db, "staff@example.com").await?.is_none() {
            Model::create(db, "Support Staff", "staff@example.com", "password123", Role::Employee, None)
                .await?;
        }
        if Model::find_by_email(db, "client@example.com").await?.is_none() {
            Model::create(
                db,
                "Demo Client",
                "client@example.com",
                "password123",
                Role::Client,
                Some("Demo Co"),
            )
            .await?;
        }

        // Random clients
        for _ in 0..10 {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            let company: String = CompanyName().fake();
            // Fake emails can collide.
            let _ = Model::create(db, &name, &email, "password123", Role::Client, Some(&company)).await;
        }
        Ok(())
    }
}
