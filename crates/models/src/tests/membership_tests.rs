use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

use crate::db::connect_in_memory;
use crate::{company, company_member, project, project_member};

async fn insert_company<C: ConnectionTrait>(db: &C, id: &str, owner: &str) -> Result<company::Model> {
    let am = company::ActiveModel {
        id: Set(id.to_string()),
        name: Set("Acme".into()),
        company_type: Set("enterprise".into()),
        owner_id: Set(owner.to_string()),
    };
    Ok(am.insert(db).await?)
}

fn member(company_id: &str, user_id: &str, role: &str) -> company_member::ActiveModel {
    let now = Utc::now();
    company_member::ActiveModel {
        company_id: Set(company_id.to_string()),
        user_id: Set(user_id.to_string()),
        role: Set(role.to_string()),
        status: Set("active".into()),
        joined_at: Set(Some(now.into())),
        invited_at: Set(now.into()),
        invited_by: Set("owner".into()),
        salary: Set(Some(5000.0)),
        hourly_rate: Set(None),
        ..Default::default()
    }
}

#[tokio::test]
async fn duplicate_company_member_is_unique_violation() -> Result<()> {
    let db = connect_in_memory().await?;
    insert_company(&db, "acme", "owner").await?;
    member("acme", "alice", "manager").insert(&db).await?;

    let err = member("acme", "alice", "admin").insert(&db).await.unwrap_err();
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));

    // Same user in another company is fine
    insert_company(&db, "globex", "owner").await?;
    member("globex", "alice", "manager").insert(&db).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_project_member_is_unique_violation() -> Result<()> {
    let db = connect_in_memory().await?;
    let now = Utc::now();
    let p = project::ActiveModel {
        title: Set("Roadmap".into()),
        description: Set(None),
        status: Set("active".into()),
        owner_id: Set("owner".into()),
        company_id: Set(None),
        start_date: Set(None),
        end_date: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert!(p.id > 0);

    let row = |user: &str| project_member::ActiveModel {
        project_id: Set(p.id.to_string()),
        project_type: Set(project_member::CORE_PROJECT_TYPE.into()),
        user_id: Set(user.to_string()),
        role: Set("editor".into()),
        permissions: Set(r#"["update"]"#.into()),
        joined_at: Set(now.into()),
        ..Default::default()
    };
    row("bob").insert(&db).await?;
    let err = row("bob").insert(&db).await.unwrap_err();
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
    Ok(())
}

#[tokio::test]
async fn rolled_back_company_leaves_nothing() -> Result<()> {
    let db = connect_in_memory().await?;

    let txn = db.begin().await?;
    insert_company(&txn, "acme", "owner").await?;
    member("acme", "owner", "owner").insert(&txn).await?;
    txn.rollback().await?;

    assert!(company::Entity::find_by_id("acme".to_string()).one(&db).await?.is_none());
    assert_eq!(company_member::Entity::find().count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn company_and_owner_commit_together() -> Result<()> {
    let db = connect_in_memory().await?;

    let txn = db.begin().await?;
    company::ActiveModel {
        id: Set("acme".into()),
        name: Set("Acme".into()),
        company_type: Set("enterprise".into()),
        owner_id: Set("owner".into()),
    }
    .insert(&txn)
    .await?;
    member("acme", "owner", "owner").insert(&txn).await?;
    txn.commit().await?;

    let owners = company_member::Entity::find()
        .filter(company_member::Column::CompanyId.eq("acme"))
        .filter(company_member::Column::Role.eq("owner"))
        .count(&db)
        .await?;
    assert_eq!(owners, 1);
    Ok(())
}
