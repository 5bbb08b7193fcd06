use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type managed by one admin screen.
pub trait AdminResource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Collection endpoint, e.g. `/api/admin/contact`.
    const ENDPOINT: &'static str;
    /// Plural noun used in notices and CLI arguments.
    const NAME: &'static str;
    /// Category fields the screen can filter on.
    const FACETS: &'static [&'static str];
    const CSV_HEADERS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Fields matched by the free-text search box.
    fn search_text(&self) -> Vec<&str>;

    fn facet(&self, name: &str) -> Option<&str>;

    fn csv_row(&self) -> Vec<String>;
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

/// Message left through a public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

impl AdminResource for ContactMessage {
    const ENDPOINT: &'static str = "/api/admin/contact";
    const NAME: &'static str = "contacts";
    const FACETS: &'static [&'static str] = &["status"];
    const CSV_HEADERS: &'static [&'static str] =
        &["id", "name", "email", "phone", "subject", "status", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.subject.as_str(),
            self.message.as_str(),
        ]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            _ => None,
        }
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.subject.clone(),
            self.status.label().to_string(),
            format_timestamp(&self.created_at),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Lead,
    Active,
    Inactive,
}

impl CustomerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CustomerStatus::Lead => "lead",
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

/// Tour booking or enquiry customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    pub status: CustomerStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl AdminResource for Customer {
    const ENDPOINT: &'static str = "/api/admin/customers";
    const NAME: &'static str = "customers";
    const FACETS: &'static [&'static str] = &["status", "source"];
    const CSV_HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "organization",
        "status",
        "source",
        "created_at",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.phone.as_deref());
        fields.extend(self.organization.as_deref());
        fields
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            "source" => Some(self.source.as_str()),
            _ => None,
        }
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.organization.clone().unwrap_or_default(),
            self.status.label().to_string(),
            self.source.clone(),
            format_timestamp(&self.created_at),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub author: String,
    pub category: String,
    pub status: PostStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl AdminResource for BlogPost {
    const ENDPOINT: &'static str = "/api/admin/blog/posts";
    const NAME: &'static str = "posts";
    const FACETS: &'static [&'static str] = &["status", "category"];
    const CSV_HEADERS: &'static [&'static str] = &[
        "id",
        "title",
        "slug",
        "author",
        "category",
        "status",
        "published_at",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.slug.as_str(), self.author.as_str()];
        fields.extend(self.excerpt.as_deref());
        fields
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            "category" => Some(self.category.as_str()),
            _ => None,
        }
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.slug.clone(),
            self.author.clone(),
            self.category.clone(),
            self.status.label().to_string(),
            self.published_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
        ]
    }
}
