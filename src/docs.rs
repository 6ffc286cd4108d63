// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::record_login,

        // --- CRM ---
        handlers::crm::create_lead,
        handlers::crm::list_leads,
        handlers::crm::get_lead,
        handlers::crm::update_lead_status,
        handlers::crm::create_account,
        handlers::crm::list_accounts,
        handlers::crm::get_account,
        handlers::crm::set_account_parent,
        handlers::crm::create_contact,
        handlers::crm::list_contacts,
        handlers::crm::create_opportunity,
        handlers::crm::list_opportunities,
        handlers::crm::update_opportunity_stage,
        handlers::crm::create_task,
        handlers::crm::list_tasks,
        handlers::crm::create_activity,
        handlers::crm::list_activities,
        handlers::crm::create_deal_stage,
        handlers::crm::list_deal_stages,

        // --- Support ---
        handlers::support::create_project,
        handlers::support::list_projects,
        handlers::support::create_ticket_status,
        handlers::support::list_ticket_statuses,
        handlers::support::create_ticket,
        handlers::support::list_tickets,
        handlers::support::get_ticket,
        handlers::support::update_ticket_status,
        handlers::support::add_ticket_message,
        handlers::support::list_ticket_messages,

        // --- Contact ---
        handlers::inquiries::submit_contact_form,
        handlers::inquiries::list_contact_submissions,

        // --- Billing ---
        handlers::billing::create_invoice,
        handlers::billing::list_invoices,
        handlers::billing::get_invoice,
        handlers::billing::pay_invoice,

        // --- Audit ---
        handlers::audit::list_audit_logs,

        // --- Catalog ---
        handlers::catalog::create_service,
        handlers::catalog::list_services,
        handlers::catalog::get_service,
        handlers::catalog::list_categories,
        handlers::catalog::list_apps,
        handlers::catalog::resolve_fragment,

        // --- Planning ---
        handlers::planning::submit_planning,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::NewUser,

            // --- CRM ---
            models::crm::LeadSource,
            models::crm::LeadStatus,
            models::crm::LeadRating,
            models::crm::AccountType,
            models::crm::OpportunityStage,
            models::crm::TaskType,
            models::crm::TaskStatus,
            models::crm::Priority,
            models::crm::ActivityType,
            models::crm::RelatedEntity,
            models::crm::Address,
            models::crm::Lead,
            models::crm::NewLead,
            models::crm::Account,
            models::crm::NewAccount,
            models::crm::Contact,
            models::crm::NewContact,
            models::crm::DealStage,
            models::crm::NewDealStage,
            models::crm::Opportunity,
            models::crm::NewOpportunity,
            models::crm::Task,
            models::crm::NewTask,
            models::crm::CrmActivity,
            models::crm::NewCrmActivity,
            models::Attachment,

            // --- Support ---
            models::support::TicketCategory,
            models::support::ProjectStatus,
            models::support::Project,
            models::support::NewProject,
            models::support::TicketStatus,
            models::support::NewTicketStatus,
            models::support::SupportTicket,
            models::support::NewSupportTicket,
            models::support::TicketMessage,
            models::support::NewTicketMessage,

            // --- Contact ---
            models::inquiry::ContactSubmission,
            models::inquiry::NewContactSubmission,

            // --- Billing ---
            models::billing::Currency,
            models::billing::InvoiceStatus,
            models::billing::PaymentMethod,
            models::billing::InvoiceItem,
            models::billing::Invoice,
            models::billing::NewInvoice,
            models::billing::PayInvoicePayload,

            // --- Audit ---
            models::audit::AuditAction,
            models::audit::FieldChange,
            models::audit::AuditDiff,
            models::audit::AuditLog,

            // --- Catalog ---
            models::catalog::Service,
            models::catalog::NewService,
            handlers::catalog::CatalogCard,
            handlers::catalog::CategoryLabel,
            handlers::catalog::DetailResolution,

            // --- Planning ---
            services::planning_service::PlanningVariant,
            services::planning_service::StoredFile,
            services::planning_service::PlanningReceipt,

            // --- Payloads ---
            handlers::crm::UpdateLeadStatusPayload,
            handlers::crm::SetAccountParentPayload,
            handlers::crm::UpdateOpportunityStagePayload,
            handlers::support::UpdateTicketStatusPayload,
            handlers::health::HealthReport,
        )
    ),
    tags(
        (name = "Health", description = "Estado do servidor"),
        (name = "Users", description = "Usuários da equipe e clientes"),
        (name = "CRM", description = "Leads, Contas, Contatos, Oportunidades e Tarefas"),
        (name = "Support", description = "Projetos e Chamados de Suporte"),
        (name = "Billing", description = "Faturas e Pagamentos"),
        (name = "Contact", description = "Formulário de Contato do Site"),
        (name = "Audit", description = "Trilha de Auditoria"),
        (name = "Catalog", description = "Serviços e Catálogo de Apps"),
        (name = "Planning", description = "Envio do Assistente de Planejamento")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_the_planning_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/mobile-app-planning"));
        assert!(doc.paths.paths.contains_key("/api/crm/accounts/{id}/parent"));
        assert!(doc.paths.paths.contains_key("/api/support/tickets/{id}/messages"));
        assert!(doc.paths.paths.contains_key("/api/contact-submissions"));
    }
}
