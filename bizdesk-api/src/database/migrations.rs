use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create companies table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            industry TEXT,
            size TEXT,
            website TEXT,
            phone TEXT,
            email TEXT,
            address TEXT,
            notes TEXT,
            relationship_strength INTEGER NOT NULL DEFAULT 3,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create contacts table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY,
            company_id TEXT REFERENCES companies (id) ON DELETE SET NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            title TEXT,
            email TEXT,
            phone TEXT,
            department TEXT,
            notes TEXT,
            is_primary BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create deals table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS deals (
            id TEXT PRIMARY KEY,
            company_id TEXT REFERENCES companies (id) ON DELETE SET NULL,
            contact_id TEXT REFERENCES contacts (id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            description TEXT,
            value REAL NOT NULL DEFAULT 0,
            stage TEXT NOT NULL DEFAULT 'prospecting' CHECK (stage IN ('prospecting', 'qualification', 'proposal', 'negotiation', 'closed-won', 'closed-lost')),
            probability INTEGER NOT NULL DEFAULT 0,
            expected_close_date TEXT,
            actual_close_date TEXT,
            status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create inventory_items table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS inventory_items (
            id TEXT PRIMARY KEY,
            sku TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT,
            brand TEXT,
            cost_price REAL NOT NULL DEFAULT 0,
            sell_price REAL NOT NULL DEFAULT 0,
            current_stock INTEGER NOT NULL DEFAULT 0,
            min_stock_level INTEGER NOT NULL DEFAULT 0,
            max_stock_level INTEGER NOT NULL DEFAULT 1000,
            unit TEXT DEFAULT 'pcs',
            location TEXT,
            supplier TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create tasks table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            assigned_to TEXT,
            company_id TEXT REFERENCES companies (id) ON DELETE SET NULL,
            contact_id TEXT REFERENCES contacts (id) ON DELETE SET NULL,
            deal_id TEXT REFERENCES deals (id) ON DELETE SET NULL,
            due_date TEXT,
            priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
            status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed', 'cancelled')),
            completed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create communications table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS communications (
            id TEXT PRIMARY KEY,
            company_id TEXT REFERENCES companies (id) ON DELETE SET NULL,
            contact_id TEXT REFERENCES contacts (id) ON DELETE SET NULL,
            deal_id TEXT REFERENCES deals (id) ON DELETE SET NULL,
            type TEXT NOT NULL DEFAULT 'email' CHECK (type IN ('email', 'call', 'meeting', 'note')),
            subject TEXT NOT NULL,
            content TEXT,
            direction TEXT NOT NULL DEFAULT 'outbound' CHECK (direction IN ('inbound', 'outbound')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Every screen lists newest first
    for table in [
        "companies",
        "contacts",
        "deals",
        "inventory_items",
        "tasks",
        "communications",
    ] {
        conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at)"
            ),
            [],
        )?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_company ON contacts(company_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_deals_company ON deals(company_id)",
        [],
    )?;

    Ok(())
}

/// Check if database tables exist
pub fn has_schema(conn: &Connection) -> anyhow::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='companies'")?;
    Ok(stmt.exists([])?)
}
