//! # 샘플 데이터 시드
//!
//! 개발용 사용자 3명(비밀번호 `password123`)과 샘플 문서를 넣습니다.
//! 이미 있는 이메일의 사용자는 건너뛰며, 새로 만든 사용자가 없으면 문서도 넣지 않습니다.
//!
//! 실행: `DATABASE_URL=sqlite:data/knowbase.db cargo run --bin seed`

use std::time::Duration;

use anyhow::{Context, Result};
use knowbase::{
    db::{self, articles as db_articles, users as db_users},
    services::password,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEED_PASSWORD: &str = "password123";

const USERS: [(&str, &str); 3] = [
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
    ("Admin User", "admin@example.com"),
];

const ARTICLES: [(&str, &str); 4] = [
    (
        "Introduction to Artificial Intelligence",
        "Artificial Intelligence is a branch of computer science that builds systems able to \
         perform tasks that normally require human intelligence. Narrow AI handles a single task \
         such as image recognition, while general AI would match human reasoning across domains. \
         Machine learning lets systems improve from experience without explicit programming. \
         Deep learning stacks many neural network layers to find patterns in large datasets.",
    ),
    (
        "Database Design Best Practices",
        "Good database design keeps data consistent and queries fast. Normalization removes \
         redundant copies of the same fact. Indexes speed up the most common lookups but slow \
         down writes, so they should follow real query patterns. Foreign key constraints keep \
         relationships between tables valid. Regular backups protect against data loss.",
    ),
    (
        "Understanding RESTful APIs",
        "REST is an architectural style for networked applications built around resources. \
         Each resource is addressed by a URL and manipulated with standard HTTP methods. \
         GET reads a resource, POST creates one, PUT replaces it, and DELETE removes it. \
         Status codes tell the client whether a request succeeded or why it failed.",
    ),
    (
        "Why Rust for Backend Services",
        "Rust offers memory safety without a garbage collector. The borrow checker rejects \
         data races at compile time, which makes concurrent servers easier to get right. \
         Async runtimes such as Tokio handle thousands of connections on a few threads. \
         Strong types catch many mistakes before the code ever runs.",
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,knowbase=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::connect_with(&database_url, 1, Duration::from_secs(5)).await?;

    tracing::info!("Seeding database...");
    let password_hash = password::hash_password(SEED_PASSWORD)?;

    let mut created = Vec::new();
    for (name, email) in USERS {
        if db_users::find_by_email(&pool, email).await?.is_some() {
            tracing::warn!("User already exists: {}", email);
            continue;
        }
        let user = db_users::create_user(&pool, email, name, &password_hash).await?;
        tracing::info!("Created user: {} (id {})", user.name, user.id);
        created.push(user.id);
    }

    if created.is_empty() {
        tracing::info!("No new users, skipping sample articles");
        return Ok(());
    }

    for (i, (title, content)) in ARTICLES.iter().enumerate() {
        let author_id = created[i % created.len()];
        let article = db_articles::create_article(&pool, title, content, author_id).await?;
        tracing::info!("Created article: {} (id {})", article.title, article.id);
    }

    tracing::info!(
        "Seeding completed: {} users, {} articles",
        created.len(),
        ARTICLES.len()
    );
    Ok(())
}
