use clap::Parser;
use eyre::{Context, OptionExt};
use minorm::{
    Database, Entity,
    connection::get_database_url,
    entity::{column::ComparableColumn, model::Model as _},
};
use tracing::info;

use crate::student::{self, columns};

/// Run the student walkthrough against a database: insert, read back, filter, delete
#[derive(Parser, Debug)]
pub struct Demo {
    /// The URL of the database to use. If left unset, will be pulled from the `DATABASE_URL`
    /// environment variable, or a corresponding `.env` file instead.
    #[arg(short, long, value_name = "DATABASE_URL")]
    database_url: Option<String>,
}

impl Demo {
    pub async fn run(&self) -> eyre::Result<()> {
        let database_url = self
            .database_url
            .clone()
            .or_else(get_database_url)
            .ok_or_eyre(
                "Missing database URL, either set the `DATABASE_URL` environment variable, or specify it manually via --database-url [URL]",
            )?;

        let mut db = Database::connect(&database_url)
            .await
            .context("Failed to connect to database")?;

        let pavlo = student::Entity::insert(
            &mut db,
            student::ActiveModel {
                name: "Pavlo".to_string().into(),
                ..Default::default()
            },
        )
        .await?;
        info!("Inserted {pavlo:?}");

        student::Entity::insert(
            &mut db,
            student::ActiveModel {
                name: "A".to_string().into(),
                age: Some(52).into(),
                ..Default::default()
            },
        )
        .await?;
        db.commit().await?;

        let name = pavlo.get::<columns::Name>(&mut db).await?;
        info!("{pavlo:?} is called {name}");

        for record in student::Entity::get_many(&mut db, Some(columns::Age::gt(Some(20)))).await? {
            let model = record.load(&mut db).await?;
            info!("Older than 20: {model:?}");
        }

        let missing = student::Entity::get_one(&mut db, columns::Name::eq("NoSuchName".into())).await?;
        info!("Looking up \"NoSuchName\" gave {missing:?}");

        // Re-inserting an existing row violates its primary key.
        let duplicate = pavlo.load(&mut db).await?.into_active();
        match student::Entity::insert(&mut db, duplicate).await {
            Ok(record) => info!("Unexpectedly inserted {record:?} twice"),
            Err(e) => info!("Duplicate insert rejected: {e}"),
        }

        student::Entity::delete(&mut db, columns::Id::gt(0)).await?;
        db.commit().await?;

        let remaining = student::Entity::get_many(&mut db, None).await?.len();
        info!("{remaining} students left after deleting everything");

        db.close().await?;

        Ok(())
    }
}
