use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use models::{group, group_student, student};

use crate::errors::ServiceError;
use crate::pagination::ListWindow;

/// List groups whose name contains `name`, ordered ascending by name, then
/// windowed. Members are not loaded.
pub async fn list_groups(
    db: &DatabaseConnection,
    name: Option<&str>,
    window: ListWindow,
) -> Result<Vec<group::Model>, ServiceError> {
    let mut query = group::Entity::find();
    if let Some(pattern) = name.filter(|p| !p.is_empty()) {
        query = query.filter(group::Column::Name.contains(pattern));
    }
    query
        .order_by_asc(group::Column::Name)
        .offset(window.skip)
        .limit(window.take)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get a group with its members eagerly loaded. Absence is `Ok(None)`, not an
/// error; the transport decides what a missing group means.
pub async fn get_group(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<(group::Model, Vec<student::Model>)>, ServiceError> {
    let mut rows = group::Entity::find_by_id(id)
        .find_with_related(student::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows.pop())
}

/// Insert a group with a fresh id and return the persisted row.
pub async fn add_group(db: &DatabaseConnection, name: &str) -> Result<group::Model, ServiceError> {
    let created = group::create(db, name).await?;
    Ok(created)
}

/// Delete a group. Membership rows go with it via the cascade; deleting a
/// group that does not exist is an error, unlike a read miss.
pub async fn delete_group(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let found = group::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("group", id))?;
    found.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

/// Attach a student to a group. Both sides are checked independently so the
/// error names whichever id was missing. Re-adding an existing member is a
/// no-op success.
pub async fn add_student_to_group(
    db: &DatabaseConnection,
    group_id: Uuid,
    student_id: Uuid,
) -> Result<(), ServiceError> {
    group::Entity::find_by_id(group_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("group", group_id))?;

    student::Entity::find_by_id(student_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("student", student_id))?;

    let existing = group_student::Entity::find_by_id((group_id, student_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Ok(());
    }

    let am = group_student::ActiveModel {
        group_id: Set(group_id),
        student_id: Set(student_id),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn group_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let name = format!("svc_group_{}", Uuid::new_v4());
        let g = add_group(&db, &name).await?;
        assert_eq!(g.name, name);

        let (found, members) = get_group(&db, g.id).await?.unwrap();
        assert_eq!(found.id, g.id);
        assert_eq!(found.name, name);
        assert!(members.is_empty());

        delete_group(&db, g.id).await?;
        let after = get_group(&db, g.id).await?;
        assert!(after.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_group_is_not_found() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let id = Uuid::new_v4();
        let err = delete_group(&db, id).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert!(msg.contains(&id.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn membership_add_and_idempotent_readd() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let g = add_group(&db, &format!("svc_members_{}", Uuid::new_v4())).await?;
        let s = models::student::create(&db, &format!("svc_student_{}", Uuid::new_v4())).await?;

        add_student_to_group(&db, g.id, s.id).await?;
        let (_, members) = get_group(&db, g.id).await?.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, s.id);

        // Second add of the same pair leaves a single row
        add_student_to_group(&db, g.id, s.id).await?;
        let (_, members) = get_group(&db, g.id).await?.unwrap();
        assert_eq!(members.len(), 1);

        delete_group(&db, g.id).await?;
        models::student::Entity::delete_by_id(s.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn membership_add_names_the_missing_id() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let g = add_group(&db, &format!("svc_missing_{}", Uuid::new_v4())).await?;
        let bogus_student = Uuid::new_v4();
        let err = add_student_to_group(&db, g.id, bogus_student).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert!(msg.contains("student"));
                assert!(msg.contains(&bogus_student.to_string()));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }

        let bogus_group = Uuid::new_v4();
        let err = add_student_to_group(&db, bogus_group, bogus_student).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert!(msg.contains("group"));
                assert!(msg.contains(&bogus_group.to_string()));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }

        delete_group(&db, g.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_groups_filters_orders_and_windows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        // Unique prefix keeps this test independent of other rows
        let prefix = format!("svc_list_{}", Uuid::new_v4());
        let mut ids = vec![];
        for suffix in ["C", "A", "B"] {
            let g = add_group(&db, &format!("{prefix}_{suffix}")).await?;
            ids.push(g.id);
        }

        let all = list_groups(&db, Some(&prefix), ListWindow::default()).await?;
        let names: Vec<_> = all.iter().map(|g| g.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                format!("{prefix}_A"),
                format!("{prefix}_B"),
                format!("{prefix}_C"),
            ]
        );

        let window = ListWindow { skip: 1, take: 1 };
        let page = list_groups(&db, Some(&prefix), window).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, format!("{prefix}_B"));

        let empty = list_groups(&db, Some(&prefix), ListWindow { skip: 0, take: 0 }).await?;
        assert!(empty.is_empty());

        // Skipping past the filtered set yields nothing
        let past = list_groups(&db, Some(&prefix), ListWindow { skip: 10, take: 5 }).await?;
        assert!(past.is_empty());

        for id in ids {
            delete_group(&db, id).await?;
        }
        Ok(())
    }
}
