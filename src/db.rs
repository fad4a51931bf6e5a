use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database")
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS contacts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        company TEXT,
        subject TEXT,
        message TEXT NOT NULL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS team (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        title TEXT NOT NULL,
        bio TEXT,
        photo_url TEXT
    )",
    "CREATE TABLE IF NOT EXISTS careers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        experience_required INTEGER DEFAULT 0,
        location TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        type TEXT NOT NULL,
        content TEXT NOT NULL,
        file_path TEXT
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        logo_url TEXT
    )",
    "CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        designation TEXT,
        profile_picture_url TEXT,
        email TEXT UNIQUE,
        phone TEXT
    )",
    "CREATE TABLE IF NOT EXISTS company_handbook (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        uploaded_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        assigned_to_employee_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        due_date DATE,
        status TEXT NOT NULL DEFAULT 'Pending',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (assigned_to_employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS leave_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        reason TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Pending',
        requested_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        punch_in_time DATETIME,
        punch_out_time DATETIME,
        date DATE NOT NULL,
        UNIQUE (employee_id, date),
        FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS employee_documents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        document_type TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        uploaded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS education_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        institution_name TEXT NOT NULL,
        degree TEXT NOT NULL,
        year_of_completion INTEGER,
        details TEXT,
        FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )",
];

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

const TEAM_SEED: &[(&str, &str, &str)] = &[
    (
        "John Smith",
        "CEO & Founder",
        "Cybersecurity expert with 15+ years experience",
    ),
    (
        "Sarah Johnson",
        "CTO",
        "Former NSA analyst specializing in threat intelligence",
    ),
    (
        "Mike Chen",
        "Lead Security Engineer",
        "Penetration testing and red team operations specialist",
    ),
];

const CAREERS_SEED: &[(&str, &str, i64, &str)] = &[
    (
        "Senior Cybersecurity Analyst",
        "Join our threat intelligence team to analyze and respond to advanced persistent threats.",
        5,
        "Remote",
    ),
    (
        "Penetration Tester",
        "Conduct security assessments and vulnerability testing for enterprise clients.",
        3,
        "Hybrid",
    ),
    (
        "SOC Engineer",
        "Monitor security events and respond to incidents in our 24/7 Security Operations Center.",
        2,
        "Office",
    ),
];

const RESOURCES_SEED: &[(&str, &str, &str)] = &[
    (
        "Understanding MITRE ATT&CK Framework",
        "Blog",
        "Comprehensive guide to implementing MITRE ATT&CK in your security operations.",
    ),
    (
        "2024 Threat Landscape Report",
        "Case Study",
        "Analysis of emerging threats and attack vectors observed in the past year.",
    ),
    (
        "Zero Trust Architecture Implementation",
        "Technical Aspect",
        "Technical whitepaper on implementing zero trust security models.",
    ),
];

const PRODUCTS_SEED: &[(&str, &str)] = &[
    (
        "ThreatScope Pro",
        "Advanced threat intelligence platform with real-time monitoring and analysis.",
    ),
    (
        "SecureShield Enterprise",
        "Comprehensive endpoint protection and response solution.",
    ),
    (
        "CyberWatch 24/7",
        "Managed security operations center services with expert monitoring.",
    ),
];

async fn table_is_empty(pool: &SqlitePool, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

/// Inserts the demo site content, but only into tables that are still empty
/// so restarts never duplicate or clobber operator edits.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    if table_is_empty(pool, "team").await? {
        for (name, title, bio) in TEAM_SEED {
            sqlx::query("INSERT INTO team (name, title, bio, photo_url) VALUES (?, ?, ?, ?)")
                .bind(name)
                .bind(title)
                .bind(bio)
                .bind("")
                .execute(pool)
                .await?;
        }
        tracing::info!("Seeded team table");
    }

    if table_is_empty(pool, "careers").await? {
        for (title, description, experience, location) in CAREERS_SEED {
            sqlx::query(
                "INSERT INTO careers (title, description, experience_required, location) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(title)
            .bind(description)
            .bind(experience)
            .bind(location)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded careers table");
    }

    if table_is_empty(pool, "resources").await? {
        for (title, resource_type, content) in RESOURCES_SEED {
            sqlx::query("INSERT INTO resources (title, type, content) VALUES (?, ?, ?)")
                .bind(title)
                .bind(resource_type)
                .bind(content)
                .execute(pool)
                .await?;
        }
        tracing::info!("Seeded resources table");
    }

    if table_is_empty(pool, "products").await? {
        for (name, description) in PRODUCTS_SEED {
            sqlx::query("INSERT INTO products (name, description, logo_url) VALUES (?, ?, ?)")
                .bind(name)
                .bind(description)
                .bind("")
                .execute(pool)
                .await?;
        }
        tracing::info!("Seeded products table");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[actix_web::test]
    async fn seeding_is_idempotent() {
        let pool = setup_test_db().await;
        seed_demo_data(&pool).await.unwrap();
        seed_demo_data(&pool).await.unwrap();

        let teams: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(teams, 3);
    }

    #[actix_web::test]
    async fn seed_respects_existing_rows() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO team (name, title) VALUES ('Existing', 'Analyst')")
            .execute(&pool)
            .await
            .unwrap();

        seed_demo_data(&pool).await.unwrap();

        let teams: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(teams, 1);
    }

    #[actix_web::test]
    async fn cascade_deletes_follow_employee() {
        let pool = setup_test_db().await;
        sqlx::query(
            "INSERT INTO employees (full_name, username, password_hash) VALUES ('A', 'a', 'h')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO education_history (employee_id, institution_name, degree) \
             VALUES (1, 'MIT', 'BSc')",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("DELETE FROM employees WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM education_history")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }
}
