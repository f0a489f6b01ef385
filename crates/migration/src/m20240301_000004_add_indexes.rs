use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Group: name drives both the substring filter and the list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_group_name")
                    .table(Group::Table)
                    .col(Group::Name)
                    .to_owned(),
            )
            .await?;

        // Membership: reverse lookups by student
        manager
            .create_index(
                Index::create()
                    .name("idx_group_student_student")
                    .table(GroupStudent::Table)
                    .col(GroupStudent::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_group_student_student").table(GroupStudent::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_group_name").table(Group::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Group { Table, Name }

#[derive(DeriveIden)]
enum GroupStudent { Table, StudentId }
