use crate::core::model::{Placeholder, SlotKey};
use anyhow::Context;
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Previously uploaded files, read once at start-up to pre-fill slots.
#[derive(Clone)]
pub struct PlaceholderStore {
    pool: SqlitePool,
}

impl PlaceholderStore {
    pub async fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create_dir_all {}", parent.display()))?;
            }
        }

        let abs = if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            std::env::current_dir().context("current_dir")?.join(db_path)
        };

        let mut p = abs.to_string_lossy().to_string();
        if cfg!(windows) {
            p = p.replace('\\', "/");
        }

        // mode=rwc creates the file when missing
        let url = if p.starts_with('/') {
            format!("sqlite://{}?mode=rwc", p)
        } else {
            format!("sqlite:///{}?mode=rwc", p)
        };

        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .with_context(|| format!("connect sqlite url={} (file={})", url, abs.display()))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS uploaded_images (
              slot TEXT PRIMARY KEY NOT NULL,
              name TEXT NOT NULL,
              size INTEGER NOT NULL,
              updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn now_epoch() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    pub async fn put_placeholder(&self, p: &Placeholder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO uploaded_images (slot, name, size, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
              name = excluded.name,
              size = excluded.size,
              updated_at = excluded.updated_at;
            "#,
        )
        .bind(p.slot.as_str())
        .bind(&p.name)
        .bind(p.size as i64)
        .bind(Self::now_epoch())
        .execute(&self.pool)
        .await
        .with_context(|| format!("store placeholder slot={}", p.slot))?;
        Ok(())
    }

    /// Rows with an unknown slot name are skipped.
    pub async fn load_placeholders(&self) -> anyhow::Result<Vec<Placeholder>> {
        let rows = sqlx::query(
            r#"
            SELECT slot, name, size
            FROM uploaded_images;
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("load placeholders")?;

        let mut out: Vec<Placeholder> = rows
            .into_iter()
            .filter_map(|r| {
                let slot: SlotKey = r.get::<String, _>("slot").parse().ok()?;
                Some(Placeholder {
                    slot,
                    name: r.get::<String, _>("name"),
                    size: r.get::<i64, _>("size").max(0) as u64,
                })
            })
            .collect();
        out.sort_by_key(|p| p.slot);
        Ok(out)
    }
}
