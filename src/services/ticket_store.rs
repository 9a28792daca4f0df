use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};

use crate::{
    entity::tickets::{ActiveModel, Column, Entity as Tickets, Model as TicketModel},
    error::{AppError, AppResult},
    models::Ticket,
};

/// Insert one ticket row inside a transaction.
///
/// A duplicate `ticket_id` comes back as [`AppError::Conflict`] so the caller
/// can tell it apart from other storage failures, which are
/// [`AppError::SaveFailed`].
pub async fn insert<C>(conn: &C, ticket: Ticket) -> AppResult<String>
where
    C: TransactionTrait,
{
    let txn = conn.begin().await.map_err(AppError::SaveFailed)?;

    let active = ActiveModel {
        id: NotSet,
        ticket_id: Set(ticket.ticket_id.clone()),
        event: Set(ticket.event),
        num_tickets: Set(ticket.num_tickets),
        name: Set(ticket.name),
        email: Set(ticket.email),
        phone: Set(ticket.phone),
        address: Set(ticket.address),
        payment_method: Set(ticket.payment_method),
        total_amount: Set(ticket.total_amount),
        qr_code: Set(ticket.qr_code),
        created_at: Set(ticket.created_at),
    };

    if let Err(err) = active.insert(&txn).await {
        if let Err(rollback_err) = txn.rollback().await {
            tracing::warn!(
                ticket_id = %ticket.ticket_id,
                error = %rollback_err,
                "rollback after failed ticket insert failed"
            );
        }
        return Err(map_insert_error(err, &ticket.ticket_id));
    }
    txn.commit().await.map_err(AppError::SaveFailed)?;

    Ok(ticket.ticket_id)
}

pub async fn find_by_ticket_id<C>(conn: &C, ticket_id: &str) -> AppResult<Option<Ticket>>
where
    C: ConnectionTrait,
{
    let ticket = Tickets::find()
        .filter(Column::TicketId.eq(ticket_id))
        .one(conn)
        .await?
        .map(ticket_from_entity);
    Ok(ticket)
}

fn map_insert_error(err: DbErr, ticket_id: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(ticket_id.to_string()),
        _ => AppError::SaveFailed(err),
    }
}

fn ticket_from_entity(model: TicketModel) -> Ticket {
    Ticket {
        ticket_id: model.ticket_id,
        event: model.event,
        num_tickets: model.num_tickets,
        name: model.name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        payment_method: model.payment_method,
        total_amount: model.total_amount,
        qr_code: model.qr_code,
        created_at: model.created_at,
    }
}
