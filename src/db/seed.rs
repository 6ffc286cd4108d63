// src/db/seed.rs
// Dados iniciais: etapas do funil, status de chamado e o catálogo de serviços.

use crate::models::{
    catalog::NewService,
    crm::{default_color, NewDealStage},
    support::NewTicketStatus,
};

pub fn deal_stages() -> Vec<NewDealStage> {
    [
        ("Prospecting", 1, 10, "#94a3b8", false, false),
        ("Qualification", 2, 25, "#3b82f6", false, false),
        ("Proposal", 3, 50, "#8b5cf6", false, false),
        ("Negotiation", 4, 75, "#f59e0b", false, false),
        ("Closed Won", 5, 100, "#22c55e", true, true),
        ("Closed Lost", 6, 0, "#ef4444", true, false),
    ]
    .into_iter()
    .map(|(name, position, probability, color, is_closed, is_won)| NewDealStage {
        name: name.to_string(),
        position,
        probability,
        color: color.to_string(),
        is_closed,
        is_won,
    })
    .collect()
}

pub fn ticket_statuses() -> Vec<NewTicketStatus> {
    [
        ("open", 1, false),
        ("in-progress", 2, false),
        ("resolved", 3, true),
        ("closed", 4, true),
    ]
    .into_iter()
    .map(|(name, position, is_closed)| NewTicketStatus {
        name: name.to_string(),
        position,
        color: default_color(),
        is_closed,
    })
    .collect()
}

pub fn services() -> Vec<NewService> {
    let service = |title: &str,
                   description: &str,
                   icon: &str,
                   category: &str,
                   featured: bool,
                   technologies: &[&str],
                   delivery_time: &str,
                   starting_price: Option<&str>| NewService {
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
        featured,
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
        delivery_time: Some(delivery_time.to_string()),
        starting_price: starting_price.map(str::to_string),
    };

    vec![
        service(
            "تطوير تطبيقات الجوال",
            "تطبيقات iOS و Android أصلية وهجينة بأداء عالٍ وتجربة مستخدم سلسة.",
            "Smartphone",
            "development",
            true,
            &["Flutter", "React Native", "Swift", "Kotlin"],
            "4-8 أسابيع",
            Some("1500"),
        ),
        service(
            "تطوير المواقع الإلكترونية",
            "مواقع ومنصات ويب سريعة ومتجاوبة مع محركات البحث.",
            "Globe",
            "development",
            true,
            &["React", "Next.js", "Node.js", "PostgreSQL"],
            "3-6 أسابيع",
            Some("800"),
        ),
        service(
            "أنظمة ERPNext",
            "تطبيق وتخصيص نظام ERPNext لإدارة المحاسبة والمخزون والموارد البشرية.",
            "Building2",
            "erp",
            true,
            &["ERPNext", "Frappe", "Python", "MariaDB"],
            "6-12 أسبوع",
            None,
        ),
        service(
            "تصميم واجهات وتجربة المستخدم",
            "تصميم واجهات عربية وإنجليزية متكاملة من النماذج الأولية حتى التسليم.",
            "Palette",
            "design",
            false,
            &["Figma", "Adobe XD"],
            "2-4 أسابيع",
            Some("500"),
        ),
        service(
            "الاستضافة والحلول السحابية",
            "نشر وتشغيل الأنظمة على خوادم سحابية مع المراقبة والنسخ الاحتياطي.",
            "Cloud",
            "infrastructure",
            false,
            &["Docker", "Kubernetes", "AWS", "Nginx"],
            "1-2 أسبوع",
            None,
        ),
        service(
            "التسويق الرقمي",
            "إدارة الحملات الإعلانية وتحسين الظهور في محركات البحث.",
            "Megaphone",
            "marketing",
            false,
            &["Google Ads", "Meta Ads", "SEO"],
            "مستمر",
            Some("300"),
        ),
    ]
}
