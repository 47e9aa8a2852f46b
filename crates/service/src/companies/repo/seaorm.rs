use chrono::Utc;
use models::{company, company_member};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, Unchanged,
};
use tracing::warn;

use crate::companies::domain::{Company, CompanyMember, MemberStatus, NewCompanyMember};
use crate::companies::repository::CompanyRepository;
use crate::errors::ServiceError;

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_company(m: company::Model) -> Company {
    Company { id: m.id, name: m.name, company_type: m.company_type, owner_id: m.owner_id }
}

fn to_member(m: company_member::Model) -> CompanyMember {
    // Unrecognized statuses never count as active
    let status = MemberStatus::parse(&m.status).unwrap_or_else(|| {
        warn!(company_id = %m.company_id, user_id = %m.user_id, status = %m.status, "unknown member status");
        MemberStatus::Suspended
    });
    CompanyMember {
        id: m.id,
        company_id: m.company_id,
        user_id: m.user_id,
        role: m.role,
        status,
        joined_at: m.joined_at.map(|d| d.with_timezone(&Utc)),
        invited_at: m.invited_at.with_timezone(&Utc),
        invited_by: m.invited_by,
        salary: m.salary,
        hourly_rate: m.hourly_rate,
    }
}

fn member_active_model(m: &NewCompanyMember) -> company_member::ActiveModel {
    company_member::ActiveModel {
        company_id: Set(m.company_id.clone()),
        user_id: Set(m.user_id.clone()),
        role: Set(m.role.clone()),
        status: Set(m.status.as_str().to_string()),
        joined_at: Set(m.joined_at.map(Into::into)),
        invited_at: Set(m.invited_at.into()),
        invited_by: Set(m.invited_by.clone()),
        salary: Set(m.salary),
        hourly_rate: Set(m.hourly_rate),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn create_company(&self, c: &Company, owner: &NewCompanyMember) -> Result<Company, ServiceError> {
        let txn = self.db.begin().await?;
        let am = company::ActiveModel {
            id: Set(c.id.clone()),
            name: Set(c.name.clone()),
            company_type: Set(c.company_type.clone()),
            owner_id: Set(c.owner_id.clone()),
        };
        let created = am
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::from_db_conflict(e, "company already exists"))?;
        member_active_model(owner)
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::from_db_conflict(e, "owner membership already exists"))?;
        txn.commit().await?;
        Ok(to_company(created))
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>, ServiceError> {
        let res = company::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(res.map(to_company))
    }

    async fn update_company(&self, c: &Company) -> Result<Company, ServiceError> {
        let am = company::ActiveModel {
            id: Unchanged(c.id.clone()),
            name: Set(c.name.clone()),
            company_type: Set(c.company_type.clone()),
            owner_id: Set(c.owner_id.clone()),
        };
        match am.update(&self.db).await {
            Ok(m) => Ok(to_company(m)),
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found("company")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_company(&self, id: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        company_member::Entity::delete_many()
            .filter(company_member::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        company::Entity::delete_by_id(id.to_string()).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn find_company_member(&self, company_id: &str, user_id: &str) -> Result<Option<CompanyMember>, ServiceError> {
        let res = company_member::Entity::find()
            .filter(company_member::Column::CompanyId.eq(company_id))
            .filter(company_member::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(res.map(to_member))
    }

    async fn list_company_members(&self, company_id: &str) -> Result<Vec<CompanyMember>, ServiceError> {
        let rows = company_member::Entity::find()
            .filter(company_member::Column::CompanyId.eq(company_id))
            .order_by_asc(company_member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_member).collect())
    }

    async fn list_active_memberships(&self, user_id: &str) -> Result<Vec<CompanyMember>, ServiceError> {
        let rows = company_member::Entity::find()
            .filter(company_member::Column::UserId.eq(user_id))
            .filter(company_member::Column::Status.eq(MemberStatus::Active.as_str()))
            .order_by_asc(company_member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_member).collect())
    }

    async fn add_company_member(&self, member: &NewCompanyMember) -> Result<CompanyMember, ServiceError> {
        let created = member_active_model(member)
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::from_db_conflict(e, "user is already a member of this company"))?;
        Ok(to_member(created))
    }

    async fn remove_company_member(&self, company_id: &str, user_id: &str) -> Result<(), ServiceError> {
        company_member::Entity::delete_many()
            .filter(company_member::Column::CompanyId.eq(company_id))
            .filter(company_member::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::domain::Compensation;
    use crate::test_support::{company, sqlite_db};

    fn owner_row(c: &Company) -> NewCompanyMember {
        NewCompanyMember::active(&c.id, &c.owner_id, "owner", &c.owner_id, Utc::now(), Compensation::default())
    }

    #[tokio::test]
    async fn create_company_seeds_owner_and_rejects_duplicate_id() -> Result<(), anyhow::Error> {
        let repo = SeaOrmCompanyRepository::new(sqlite_db().await?);
        let c = company("acme", "owner");
        repo.create_company(&c, &owner_row(&c)).await?;

        let err = repo.create_company(&c, &owner_row(&c)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let members = repo.list_company_members("acme").await?;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, "owner");
        assert!(members[0].is_active());
        Ok(())
    }

    #[tokio::test]
    async fn delete_company_removes_members() -> Result<(), anyhow::Error> {
        let repo = SeaOrmCompanyRepository::new(sqlite_db().await?);
        let c = company("acme", "owner");
        repo.create_company(&c, &owner_row(&c)).await?;
        let pay = Compensation { salary: Some(4200.0), hourly_rate: Some(25.5) };
        let added = repo
            .add_company_member(&NewCompanyMember::active("acme", "alice", "manager", "owner", Utc::now(), pay))
            .await?;
        assert_eq!(added.salary, Some(4200.0));
        assert_eq!(added.hourly_rate, Some(25.5));

        repo.delete_company("acme").await?;
        assert!(repo.find_company("acme").await?.is_none());
        assert!(repo.list_company_members("acme").await?.is_empty());
        assert!(repo.list_active_memberships("alice").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn member_lookup_update_and_removal() -> Result<(), anyhow::Error> {
        let repo = SeaOrmCompanyRepository::new(sqlite_db().await?);
        let mut c = company("acme", "owner");
        repo.create_company(&c, &owner_row(&c)).await?;
        let alice = NewCompanyMember::active("acme", "alice", "employee", "owner", Utc::now(), Compensation::default());
        repo.add_company_member(&alice).await?;
        assert!(matches!(repo.add_company_member(&alice).await, Err(ServiceError::Conflict(_))));

        c.name = "Acme Corp".into();
        assert_eq!(repo.update_company(&c).await?.name, "Acme Corp");

        assert!(repo.find_company_member("acme", "alice").await?.is_some());
        repo.remove_company_member("acme", "alice").await?;
        assert!(repo.find_company_member("acme", "alice").await?.is_none());
        // no-op for a user without a row
        repo.remove_company_member("acme", "nobody").await?;
        Ok(())
    }
}
