//! Roles and permissions.
//!
//! Permissions and roles are upserted by slug. A role's permission list is
//! resolved by slug and each link is inserted only when the pair does not
//! exist yet; links are never removed here.

use crate::{
    config::fixtures::{PermissionFixture, RoleFixture},
    core::{
        batch::{DEFAULT_BATCH_SIZE, insert_in_batches},
        lookup,
        summary::{SeedSummary, UpsertOutcome},
    },
    entities::{Permission, Role, permission, role, role_permission},
    errors::Result,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Inserts or updates one permission by slug.
pub async fn upsert_permission<C>(
    db: &C,
    fixture: &PermissionFixture,
    now: NaiveDateTime,
) -> Result<UpsertOutcome>
where
    C: ConnectionTrait,
{
    let existing = Permission::find()
        .filter(permission::Column::Slug.eq(fixture.slug.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row) if row.description == fixture.description => Ok(UpsertOutcome::Unchanged),
        Some(row) => {
            let mut active_model: permission::ActiveModel = row.into();
            active_model.description = Set(fixture.description.clone());
            active_model.updated_at = Set(now);
            active_model.update(db).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            permission::ActiveModel {
                slug: Set(fixture.slug.clone()),
                description: Set(fixture.description.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Inserts or updates one role by slug, returning the role's id with the outcome.
pub async fn upsert_role<C>(
    db: &C,
    fixture: &RoleFixture,
    now: NaiveDateTime,
) -> Result<(i64, UpsertOutcome)>
where
    C: ConnectionTrait,
{
    let existing = Role::find()
        .filter(role::Column::Slug.eq(fixture.slug.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row) if row.name == fixture.name && row.description == fixture.description => {
            Ok((row.id, UpsertOutcome::Unchanged))
        }
        Some(row) => {
            let mut active_model: role::ActiveModel = row.into();
            active_model.name = Set(fixture.name.clone());
            active_model.description = Set(fixture.description.clone());
            active_model.updated_at = Set(now);
            let updated = active_model.update(db).await?;
            Ok((updated.id, UpsertOutcome::Updated))
        }
        None => {
            let inserted = role::ActiveModel {
                slug: Set(fixture.slug.clone()),
                name: Set(fixture.name.clone()),
                description: Set(fixture.description.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok((inserted.id, UpsertOutcome::Inserted))
        }
    }
}

/// Seeds permissions.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_permissions(
    db: &DatabaseConnection,
    fixtures: &[PermissionFixture],
) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    for fixture in fixtures {
        let outcome = upsert_permission(&txn, fixture, now).await?;
        debug!("Permission '{}': {:?}", fixture.slug, outcome);
        summary.record(outcome);
    }

    txn.commit().await?;
    info!("Permissions seeded: {:?}", summary);
    Ok(summary)
}

/// Seeds roles and links each role to its permissions.
///
/// Unknown permission slugs are skipped and counted in `skipped`.
#[instrument(skip_all, fields(records = fixtures.len()))]
pub async fn seed_roles(db: &DatabaseConnection, fixtures: &[RoleFixture]) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let now = Utc::now().naive_utc();
    let mut summary = SeedSummary::default();

    let permissions = lookup::permission_ids(&txn).await?;
    let mut links = Vec::new();

    for fixture in fixtures {
        let (role_id, outcome) = upsert_role(&txn, fixture, now).await?;
        debug!("Role '{}': {:?}", fixture.slug, outcome);
        summary.record(outcome);

        for slug in &fixture.permissions {
            let Some(&permission_id) = permissions.get(slug) else {
                warn!("Permission '{}' for role '{}' not found, skipping", slug, fixture.slug);
                summary.skipped += 1;
                continue;
            };
            links.push(role_permission::ActiveModel {
                role_id: Set(role_id),
                permission_id: Set(permission_id),
                ..Default::default()
            });
        }
    }

    let conflict = OnConflict::columns([
        role_permission::Column::RoleId,
        role_permission::Column::PermissionId,
    ])
    .do_nothing()
    .to_owned();
    let outcome = insert_in_batches(&txn, links, DEFAULT_BATCH_SIZE, Some(conflict)).await?;

    txn.commit().await?;
    info!(
        "Roles seeded: {:?}, {} new permission links",
        summary, outcome.rows_inserted
    );
    Ok(summary)
}
