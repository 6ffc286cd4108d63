// src/catalog/entries.rs

use serde::Serialize;

use crate::common::i18n::Localized;

/// Sentinela do filtro que mostra todas as categorias.
pub const ALL_CATEGORIES: &str = "all";

/// Cartão do catálogo de apps. Lista estática e imutável.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub short_desc: &'static str,
    pub key_features: &'static [&'static str],
    pub tag: Option<&'static str>,
    pub stack: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub key: &'static str,
    pub label: Localized,
}

pub const CATEGORIES: &[CategoryOption] = &[
    CategoryOption { key: ALL_CATEGORIES, label: Localized::new("جميع الأنواع", "All types") },
    CategoryOption { key: "ecommerce", label: Localized::new("تجارة إلكترونية", "E-commerce") },
    CategoryOption { key: "services", label: Localized::new("خدمات عند الطلب", "On-demand services") },
    CategoryOption { key: "education", label: Localized::new("تعليم", "Education") },
    CategoryOption { key: "health", label: Localized::new("صحة", "Health") },
    CategoryOption { key: "fintech", label: Localized::new("مالية/مدفوعات", "Fintech/Payments") },
    CategoryOption { key: "logistics", label: Localized::new("توصيل/نقل", "Delivery/Transport") },
    CategoryOption { key: "media", label: Localized::new("وسائط/ترفيه", "Media/Entertainment") },
];

pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    ENTRIES.iter().find(|entry| entry.id == id)
}

pub static ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "ec1",
        category: "ecommerce",
        title: "متجر إلكتروني متعدد البائعين",
        short_desc: "تحويل البيع إلى أونلاين مع إدارة مخزون ودفع آمن",
        key_features: &["سلة شراء متقدمة", "بوابات دفع محلية وعالمية", "كوبونات وعروض", "تقارير المبيعات", "دعم عربي/إنجليزي"],
        tag: Some("Enterprise"),
        stack: &["React Native", "Node.js/Express", "PostgreSQL", "Redis", "Stripe"],
    },
    CatalogEntry {
        id: "ec2",
        category: "ecommerce",
        title: "متجر D2C سريع الإطلاق",
        short_desc: "أطلق متجرك خلال أسابيع",
        key_features: &["قوالب جاهزة", "دفع آمن", "ربط شحن", "إشعارات فورية"],
        tag: Some("MVP"),
        stack: &["Flutter", "Firebase", "Cloud Functions", "Stripe"],
    },
    CatalogEntry {
        id: "ec3",
        category: "ecommerce",
        title: "تطبيق عروض وكوبونات",
        short_desc: "منصة للعروض والخصومات الذكية",
        key_features: &["كوبونات QR", "عروض موقعية", "برنامج ولاء", "تتبع الاستخدام", "تحليلات متقدمة"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "Redis"],
    },
    CatalogEntry {
        id: "sv1",
        category: "services",
        title: "طلب خدمات عند الطلب",
        short_desc: "حجوزات وفوترة وتتبع مزودين",
        key_features: &["خرائط وتتبع", "مواعيد ودفعات", "مراجعات العملاء", "نظام تقييم", "دعم متعدد الخدمات"],
        tag: None,
        stack: &["React Native", "Node.js", "MongoDB", "Socket.io"],
    },
    CatalogEntry {
        id: "sv2",
        category: "services",
        title: "تطبيق صيانة منزلية",
        short_desc: "كهرباء، سباكة، تكييف بنقرة واحدة",
        key_features: &["حجز فوري", "فنيين معتمدين", "تسعير شفاف", "ضمان الخدمة", "متابعة الطلب"],
        tag: None,
        stack: &["Flutter", "Firebase", "Cloud Functions", "Google Maps"],
    },
    CatalogEntry {
        id: "sv3",
        category: "services",
        title: "منصة خدمات تنظيف",
        short_desc: "تنظيف منازل ومكاتب بمعايير عالية",
        key_features: &["جدولة ذكية", "فرق مدربة", "مواد آمنة", "تقييم بعد الخدمة", "اشتراكات دورية"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "Socket.io"],
    },
    CatalogEntry {
        id: "ed1",
        category: "education",
        title: "منصة تعلم إلكتروني",
        short_desc: "كورسات، اختبارات، شهادات",
        key_features: &["بث مباشر", "اختبارات تفاعلية", "لوحة مدرس", "تتبع التقدم", "شهادات معتمدة"],
        tag: None,
        stack: &["React Native", "WebRTC", "PostgreSQL", "AWS S3"],
    },
    CatalogEntry {
        id: "ed2",
        category: "education",
        title: "تطبيق تعلم لغات",
        short_desc: "تعلم اللغات بطريقة تفاعلية وممتعة",
        key_features: &["دروس تفاعلية", "تقييم النطق", "ألعاب تعليمية", "متابعة اليومية", "دردشة مع ناطقين"],
        tag: None,
        stack: &["Flutter", "AI/ML APIs", "Firebase", "Speech Recognition"],
    },
    CatalogEntry {
        id: "ed3",
        category: "education",
        title: "مدرسة افتراضية",
        short_desc: "إدارة مدرسية شاملة ومتكاملة",
        key_features: &["حضور وغياب", "درجات ونتائج", "تواصل أولياء أمور", "جدول حصص", "مكتبة رقمية"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "WebRTC"],
    },
    CatalogEntry {
        id: "he1",
        category: "health",
        title: "عيادة عن بُعد",
        short_desc: "مواعيد، وصفات، سجلات",
        key_features: &["مكالمات فيديو", "وصفات PDF", "سجلات مشفرة", "تذكير بالدواء", "تقارير طبية"],
        tag: None,
        stack: &["React Native", "WebRTC", "PostgreSQL", "End-to-End Encryption"],
    },
    CatalogEntry {
        id: "he2",
        category: "health",
        title: "متابعة اللياقة الذكية",
        short_desc: "تمارين، تغذية، تتبع صحي شامل",
        key_features: &["برامج تمارين مخصصة", "تتبع السعرات", "مراقبة الوزن", "تحفيز ذكي", "تقارير صحية"],
        tag: None,
        stack: &["Flutter", "AI/ML", "Firebase", "HealthKit/Google Fit"],
    },
    CatalogEntry {
        id: "he3",
        category: "health",
        title: "إدارة العيادات",
        short_desc: "نظام شامل لإدارة العيادات والمرضى",
        key_features: &["حجز المواعيد", "ملفات المرضى", "إدارة المخزون", "الفوترة الطبية", "تقارير إدارية"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "PDF Generation"],
    },
    CatalogEntry {
        id: "fi1",
        category: "fintech",
        title: "محفظة ومدفوعات رقمية",
        short_desc: "تحصيل وسداد آمن مع ميزات متقدمة",
        key_features: &["KYC متقدم", "تقارير مالية", "تصاريح دقيقة", "حماية متعددة الطبقات", "دعم عملات متعددة"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "Blockchain", "Encryption"],
    },
    CatalogEntry {
        id: "fi2",
        category: "fintech",
        title: "منصة استثمار ذكية",
        short_desc: "استثمار آمن مع نصائح مالية ذكية",
        key_features: &["محفظة متنوعة", "تحليلات السوق", "استثمار تلقائي", "إدارة المخاطر", "تقارير أداء"],
        tag: None,
        stack: &["Flutter", "AI/ML", "Real-time APIs", "Advanced Analytics"],
    },
    CatalogEntry {
        id: "fi3",
        category: "fintech",
        title: "نظام التمويل الجماعي",
        short_desc: "منصة تمويل جماعي للمشاريع",
        key_features: &["إدارة المشاريع", "نظام تبرعات", "تتبع الأهداف", "شفافية كاملة", "تقارير للمانحين"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "Payment Gateways"],
    },
    CatalogEntry {
        id: "lg1",
        category: "logistics",
        title: "نظام توصيل طلبات",
        short_desc: "أسطول وتتبع حي مع إدارة شاملة",
        key_features: &["خرائط حية", "مسارات ذكية", "إثبات التسليم", "إدارة الأسطول", "تحسين الطرق"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "Google Maps", "Socket.io"],
    },
    CatalogEntry {
        id: "lg2",
        category: "logistics",
        title: "إدارة المخازن الذكية",
        short_desc: "نظام مخازن متطور مع تتبع دقيق",
        key_features: &["مسح QR/Barcode", "تتبع المخزون", "تقارير حية", "تنبيهات نفاد", "إدارة الموردين"],
        tag: None,
        stack: &["Flutter", "Node.js", "PostgreSQL", "Barcode Scanner"],
    },
    CatalogEntry {
        id: "lg3",
        category: "logistics",
        title: "شحن وتتبع البضائع",
        short_desc: "نظام شحن متكامل مع تتبع عالمي",
        key_features: &["تتبع عالمي", "حساب التكلفة", "جدولة الشحن", "تأمين البضائع", "إشعارات التسليم"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "APIs شركات الشحن"],
    },
    CatalogEntry {
        id: "md1",
        category: "media",
        title: "منصة محتوى ووسائط",
        short_desc: "فيديو وبث وتفاعل مع الجمهور",
        key_features: &["رفع وسائط متقدم", "تعليقات وتفاعل", "تنبيهات Push", "بث مباشر", "أنظمة اشتراك"],
        tag: None,
        stack: &["React Native", "Node.js", "PostgreSQL", "CDN", "WebRTC"],
    },
    CatalogEntry {
        id: "md2",
        category: "media",
        title: "تطبيق ألعاب تفاعلية",
        short_desc: "ألعاب جماعية ومسابقات مع جوائز",
        key_features: &["ألعاب متعددة اللاعبين", "مسابقات يومية", "نظام نقاط", "جوائز حقيقية", "ترتيب عالمي"],
        tag: None,
        stack: &["Unity/Flutter", "Real-time Gaming", "Node.js", "Socket.io"],
    },
];
