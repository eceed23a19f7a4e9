//! Persistent product store using PostgreSQL.

use crate::domain::{Price, Product, Sort, SortBy};
use crate::storage::catalog::ProductStore;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, QueryBuilder, Row};

const PRODUCT_COLUMNS: &str =
    "id, name, description, (price * 100)::bigint AS price_cents, image_url, category, stock";

/// Rows per INSERT statement when seeding (7 binds per row, well under the bind limit).
const INSERT_CHUNK: usize = 1000;

/// Product store backed by an explicitly owned connection pool.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Opens a pool against `database_url`. Call [`PgProductStore::close`] on shutdown.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to DATABASE_URL")?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `products` table and its sort indexes if missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                price NUMERIC(10, 2) NOT NULL,
                image_url TEXT,
                category TEXT,
                stock INTEGER CHECK (stock IS NULL OR stock >= 0)
            )",
        )
        .execute(&self.pool)
        .await?;

        // Composite indexes match the ORDER BY used for paging (sort column, then id).
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS products_name_c_id_idx \
             ON products (name COLLATE \"C\", id COLLATE \"C\")",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS products_price_c_id_idx ON products (price, id COLLATE \"C\")",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts products, replacing any existing row with the same id.
    pub async fn insert_products(&self, products: &[Product]) -> anyhow::Result<u64> {
        let mut written = 0u64;
        let mut tx = self.pool.begin().await?;
        for chunk in products.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
                "INSERT INTO products (id, name, description, price, image_url, category, stock) ",
            );
            qb.push_values(chunk, |mut b, p| {
                b.push_bind(&p.id)
                    .push_bind(&p.name)
                    .push_bind(&p.description)
                    .push_bind(p.price.to_string())
                    .push_unseparated("::numeric")
                    .push_bind(&p.image_url)
                    .push_bind(&p.category)
                    .push_bind(p.stock);
            });
            qb.push(
                " ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    price = EXCLUDED.price,
                    image_url = EXCLUDED.image_url,
                    category = EXCLUDED.category,
                    stock = EXCLUDED.stock",
            );
            written += qb.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Removes every product.
    pub async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("TRUNCATE TABLE products").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Text columns sort by byte value, independent of the database's default collation.
fn order_key(by: SortBy) -> &'static str {
    match by {
        SortBy::Name => "name COLLATE \"C\"",
        SortBy::Price => "price",
    }
}

fn product_from_row(row: &PgRow) -> anyhow::Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: Price::from_cents(row.try_get("price_cents")?),
        image_url: row.try_get("image_url")?,
        category: row.try_get("category")?,
        stock: row.try_get("stock")?,
    })
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn count(&self) -> anyhow::Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn fetch_window(&self, sort: Sort, offset: u64, limit: u32) -> anyhow::Result<Vec<Product>> {
        let offset = i64::try_from(offset).context("offset out of range")?;

        // Column and direction come from closed enums, never from raw input.
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("SELECT ");
        qb.push(PRODUCT_COLUMNS)
            .push(" FROM products ORDER BY ")
            .push(order_key(sort.by))
            .push(" ")
            .push(sort.order.as_sql())
            .push(", id COLLATE \"C\" ASC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
