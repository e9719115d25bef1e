use super::models::{NewPostRecord, PostRecord};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait PostRepository {
    /// Inserts a row with an empty document and returns its id.
    fn reserve(&self, record: &NewPostRecord) -> Result<i64>;
    fn save(&self, record: &PostRecord) -> Result<()>;
    fn get(&self, id: i64) -> Result<Option<PostRecord>>;
    fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>>;
    fn list_recent(&self, limit: usize) -> Result<Vec<PostRecord>>;
}

pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn posts(&self) -> impl PostRepository + '_ {
        SqlitePostRepository { conn: self.conn }
    }
}

struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

const POST_COLUMNS: &str = "id, slug, status, document, created_at, updated_at";

fn map_post(row: &Row<'_>) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: row.get(0)?,
        slug: row.get(1)?,
        status: row.get(2)?,
        document: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl<'conn> PostRepository for SqlitePostRepository<'conn> {
    fn reserve(&self, record: &NewPostRecord) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO posts (slug, status, document, created_at, updated_at)
            VALUES (?1, ?2, '', ?3, ?3)
            "#,
            params![record.slug, record.status, record.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn save(&self, record: &PostRecord) -> Result<()> {
        self.conn.execute(
            r#"
            UPDATE posts
            SET slug = ?2, status = ?3, document = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.slug,
                record.status,
                record.document,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Option<PostRecord>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id],
                map_post,
            )
            .optional()?)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = ?1"),
                params![slug],
                map_post,
            )
            .optional()?)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<PostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE document != '' \
             ORDER BY datetime(updated_at) DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], map_post)?;
        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }
}
