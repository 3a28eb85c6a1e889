use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建会话表
        manager
            .create_table(
                Table::create()
                    .table(Conversations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Conversations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Conversations::Title).string().null())
                    .col(
                        ColumnDef::new(Conversations::IsGroup)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Conversations::ModuleId).big_integer().null())
                    .col(ColumnDef::new(Conversations::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Conversations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建会话成员表，(conversation, user) 唯一
        manager
            .create_table(
                Table::create()
                    .table(ConversationParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConversationParticipants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConversationParticipants::ConversationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConversationParticipants::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConversationParticipants::Role)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ConversationParticipants::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConversationParticipants::LastReadAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ConversationParticipants::Table,
                                ConversationParticipants::ConversationId,
                            )
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_conversation_participants_conversation_user")
                    .table(ConversationParticipants::Table)
                    .col(ConversationParticipants::ConversationId)
                    .col(ConversationParticipants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建消息表（只追加，按创建时间排序）
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::ConversationId).string().not_null())
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::Text).text().not_null())
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::ConversationId)
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_conversation_created")
                    .table(Messages::Table)
                    .col(Messages::ConversationId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建通话会话表
        manager
            .create_table(
                Table::create()
                    .table(CallSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CallSessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CallSessions::ConversationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CallSessions::HostId).big_integer().null())
                    .col(
                        ColumnDef::new(CallSessions::RoomName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CallSessions::Status).string().not_null())
                    .col(ColumnDef::new(CallSessions::StartedAt).big_integer().null())
                    .col(ColumnDef::new(CallSessions::EndedAt).big_integer().null())
                    .col(
                        ColumnDef::new(CallSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CallSessions::Table, CallSessions::ConversationId)
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CallSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConversationParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Conversations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Conversations {
    #[sea_orm(iden = "conversations")]
    Table,
    Id,
    Title,
    IsGroup,
    ModuleId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConversationParticipants {
    #[sea_orm(iden = "conversation_participants")]
    Table,
    Id,
    ConversationId,
    UserId,
    Role,
    JoinedAt,
    LastReadAt,
}

#[derive(DeriveIden)]
enum Messages {
    #[sea_orm(iden = "messages")]
    Table,
    Id,
    ConversationId,
    SenderId,
    Text,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CallSessions {
    #[sea_orm(iden = "call_sessions")]
    Table,
    Id,
    ConversationId,
    HostId,
    RoomName,
    Status,
    StartedAt,
    EndedAt,
    CreatedAt,
}
