//! Create `group_student` membership table.
//!
//! Explicit join representation for the many-to-many Group/Student
//! association. The composite primary key makes a duplicate membership
//! unrepresentable, and deleting a group cascades to its membership rows
//! without touching the student rows.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupStudent::Table)
                    .if_not_exists()
                    .col(uuid(GroupStudent::GroupId).not_null())
                    .col(uuid(GroupStudent::StudentId).not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupStudent::GroupId)
                            .col(GroupStudent::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_student_group")
                            .from(GroupStudent::Table, GroupStudent::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_student_student")
                            .from(GroupStudent::Table, GroupStudent::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GroupStudent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum GroupStudent { Table, GroupId, StudentId }

#[derive(DeriveIden)]
enum Group { Table, Id }

#[derive(DeriveIden)]
enum Student { Table, Id }
