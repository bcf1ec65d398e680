use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use lovelite_auth_schema::otp_codes;

use crate::domain::repository::OtpCodeRepository;
use crate::domain::types::OtpCode;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbOtpCodeRepository {
    pub db: DatabaseConnection,
}

impl OtpCodeRepository for DbOtpCodeRepository {
    async fn invalidate_unused(&self, email: &str) -> Result<u64, AuthServiceError> {
        let result = otp_codes::Entity::update_many()
            .col_expr(otp_codes::Column::Used, Expr::value(true))
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("invalidate outstanding otp codes")?;
        Ok(result.rows_affected)
    }

    async fn create(&self, code: &OtpCode) -> Result<(), AuthServiceError> {
        otp_codes::ActiveModel {
            id: Set(code.id),
            email: Set(code.email.clone()),
            code: Set(code.code.clone()),
            used: Set(code.used),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert otp code")?;
        Ok(())
    }

    async fn consume_valid(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        // One statement carries both the validity check and the flip, so
        // concurrent redemptions of the same code race inside the database,
        // and only one sees rows_affected > 0 per row.
        let result = otp_codes::Entity::update_many()
            .col_expr(otp_codes::Column::Used, Expr::value(true))
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Code.eq(code))
            .filter(otp_codes::Column::Used.eq(false))
            .filter(otp_codes::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .context("consume otp code")?;
        Ok(result.rows_affected > 0)
    }
}
