use crate::domain::error::{AppError, Result};
use crate::domain::preferences::{ClientPreferences, FlexibilityLevel};
use sqlx::SqlitePool;

pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert-or-replace the client's preference row; both the intake form
    /// and the agent-side editor go through here.
    pub async fn upsert(&self, preferences: &ClientPreferences) -> Result<()> {
        let property_types = serde_json::to_string(&preferences.property_types)
            .map_err(|e| AppError::Internal(format!("Failed to encode property types: {e}")))?;
        let school_districts = match &preferences.school_districts {
            Some(districts) => Some(
                serde_json::to_string(districts).map_err(|e| {
                    AppError::Internal(format!("Failed to encode school districts: {e}"))
                })?,
            ),
            None => None,
        };

        sqlx::query(
            "INSERT INTO client_preferences (client_id, property_types, min_price, max_price, \
             desired_move_date, has_pool, pet_friendly, school_districts, flexibility_level) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(client_id) DO UPDATE SET \
             property_types = excluded.property_types, \
             min_price = excluded.min_price, \
             max_price = excluded.max_price, \
             desired_move_date = excluded.desired_move_date, \
             has_pool = excluded.has_pool, \
             pet_friendly = excluded.pet_friendly, \
             school_districts = excluded.school_districts, \
             flexibility_level = excluded.flexibility_level",
        )
        .bind(&preferences.client_id)
        .bind(property_types)
        .bind(preferences.min_price)
        .bind(preferences.max_price)
        .bind(preferences.desired_move_date)
        .bind(preferences.has_pool)
        .bind(preferences.pet_friendly)
        .bind(school_districts)
        .bind(preferences.flexibility_level.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save preferences: {e}")))?;

        Ok(())
    }

    pub async fn find(&self, client_id: &str) -> Result<Option<ClientPreferences>> {
        let row = sqlx::query_as::<_, PreferenceEntity>(
            "SELECT client_id, property_types, min_price, max_price, desired_move_date, \
             has_pool, pet_friendly, school_districts, flexibility_level \
             FROM client_preferences WHERE client_id = ?",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch preferences: {e}")))?;

        Ok(row.map(|e| e.into()))
    }
}

#[derive(sqlx::FromRow)]
struct PreferenceEntity {
    client_id: String,
    property_types: String,
    min_price: Option<i64>,
    max_price: Option<i64>,
    desired_move_date: Option<chrono::DateTime<chrono::Utc>>,
    has_pool: Option<bool>,
    pet_friendly: Option<bool>,
    school_districts: Option<String>,
    flexibility_level: String,
}

impl From<PreferenceEntity> for ClientPreferences {
    fn from(e: PreferenceEntity) -> Self {
        Self {
            client_id: e.client_id,
            property_types: serde_json::from_str(&e.property_types).unwrap_or_default(),
            min_price: e.min_price,
            max_price: e.max_price,
            desired_move_date: e.desired_move_date,
            has_pool: e.has_pool,
            pet_friendly: e.pet_friendly,
            school_districts: e
                .school_districts
                .as_deref()
                .and_then(|districts| serde_json::from_str(districts).ok()),
            flexibility_level: FlexibilityLevel::parse(&e.flexibility_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::agents::AgentRepository;
    use crate::infrastructure::db::clients::{tests::sample_client, ClientRepository};
    use crate::infrastructure::db::test_pool;

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row() {
        let pool = test_pool().await;
        let agent = AgentRepository::new(pool.clone())
            .get_or_create("user_1")
            .await
            .unwrap();
        let clients = ClientRepository::new(pool.clone());
        let client = sample_client(&agent.id, "john@x.com");
        clients.create(&client).await.unwrap();

        let repo = PreferenceRepository::new(pool);
        let mut preferences = ClientPreferences {
            client_id: client.id.clone(),
            property_types: vec!["CONDO".to_string()],
            min_price: Some(280_000),
            max_price: Some(400_000),
            desired_move_date: None,
            has_pool: Some(false),
            pet_friendly: Some(true),
            school_districts: None,
            flexibility_level: FlexibilityLevel::High,
        };
        repo.upsert(&preferences).await.unwrap();

        preferences.property_types = vec!["SINGLE_FAMILY".to_string(), "TOWNHOUSE".to_string()];
        preferences.min_price = Some(350_000);
        preferences.school_districts = Some(vec!["Green Hope High".to_string()]);
        repo.upsert(&preferences).await.unwrap();

        let stored = repo.find(&client.id).await.unwrap().unwrap();
        assert_eq!(stored.property_types, ["SINGLE_FAMILY", "TOWNHOUSE"]);
        assert_eq!(stored.min_price, Some(350_000));
        assert_eq!(
            stored.school_districts.as_deref(),
            Some(&["Green Hope High".to_string()][..])
        );
        assert_eq!(stored.flexibility_level, FlexibilityLevel::High);
    }
}
