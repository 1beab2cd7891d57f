//! DDL statements, migrations and seed data for the SQLite schema.
//!
//! Names are compared case-insensitively: `name`, `abbreviation` and the
//! node type name use `COLLATE NOCASE`, so equality lookups and UNIQUE
//! constraints ignore ASCII case.

/// Current schema version. Bumped whenever DDL or migrations change.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Books ---------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS book (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        title        TEXT NOT NULL UNIQUE,
        short        TEXT NOT NULL,
        abbreviation TEXT NOT NULL UNIQUE COLLATE NOCASE,
        isbn         TEXT NOT NULL DEFAULT '',
        authors      TEXT NOT NULL DEFAULT ''
    )
    "#,
    // -- Node types ----------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS node_type (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE
    )
    "#,
    // -- Nodes (catalog entries) ---------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS node (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL COLLATE NOCASE,
        type        INTEGER NOT NULL REFERENCES node_type(id),
        description TEXT,
        book        INTEGER NOT NULL REFERENCES book(id),
        page        INTEGER NOT NULL CHECK (page >= 1),
        UNIQUE (type, name)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_node_name ON node(name)",
    // -- Dependencies --------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS dependency (
        node      INTEGER NOT NULL,
        depends   INTEGER NOT NULL,
        min_value INTEGER,
        min_count TEXT,
        group_id  INTEGER,
        UNIQUE (node, depends),
        CHECK (node <> depends),
        CHECK (min_value IS NULL OR min_count IS NULL),
        FOREIGN KEY (node) REFERENCES node(id) ON DELETE CASCADE,
        FOREIGN KEY (depends) REFERENCES node(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_dependency_depends ON dependency(depends)",
    // -- Collections ---------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS collection (
        tree INTEGER NOT NULL,
        leaf INTEGER NOT NULL,
        UNIQUE (tree, leaf),
        FOREIGN KEY (tree) REFERENCES node(id) ON DELETE CASCADE,
        FOREIGN KEY (leaf) REFERENCES node(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_collection_leaf ON collection(leaf)",
    // -- Config table --------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    // -- Metadata table ------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

/// Schema migrations applied after initial DDL.
///
/// Each migration is a `(name, sql)` pair. Migrations are tracked in the
/// `metadata` table under the key `migration:<name>` so they run at most once.
pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_dependency_group_index",
    "CREATE INDEX IF NOT EXISTS idx_dependency_group ON dependency(node, group_id)",
)];

/// Node types inserted by [`SqliteStore::seed`](crate::SqliteStore::seed).
pub const SEED_NODE_TYPES: &[&str] = &[
    "Ability",
    "Skill",
    "Talent",
    "Feat",
    "Species",
    "Class",
    "Quirk",
    "Power",
    "Technique",
    "Secret",
    "Action",
    "Bonus",
];

/// Books inserted by [`SqliteStore::seed`](crate::SqliteStore::seed):
/// `(title, short, abbreviation, isbn, authors)`.
pub const SEED_BOOKS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Star Wars: Roleplaying Game - Saga Edition Core Rulebook",
        "Core Rulebook",
        "Core",
        "978-0-7869-4356-2",
        "Christopher Perkins, Owen K. C. Stephens, Rodney Thompson",
    ),
    (
        "Starships of the Galaxy",
        "Starships of the Galaxy",
        "Starships",
        "978-0-7869-4823-9",
        "Gary Astleford, Owen K. C. Stephens, Rodney Thompson",
    ),
    (
        "Threats of the Galaxy",
        "Threats of the Galaxy",
        "Threats",
        "978-0-7869-4781-2",
        "Rodney Thompson",
    ),
    (
        "Knights of the Old Republic Campaign Guide",
        "Knights of the Old Republic",
        "KOTOR",
        "978-0-7869-4923-6",
        "Rodney Thompson",
    ),
    (
        "The Force Unleashed Campaign Guide",
        "Force Unleashed",
        "Force",
        "978-0-7869-4743-0",
        "Sterling Hershey, Owen K.C. Stephens, Rodney Thompson",
    ),
    (
        "Scum and Villainy",
        "Scum and Villainy",
        "Scum",
        "978-0-7869-5035-5",
        "Gary Astleford, Robert J. Schwalb",
    ),
    (
        "The Clone Wars Campaign Guide",
        "Clone Wars",
        "Clone",
        "978-0-7869-4999-1",
        "Rodney Thompson, Patrick Stutzman, J. D. Wiker",
    ),
    (
        "Legacy Era Campaign Guide",
        "Legacy Era",
        "Legacy",
        "978-0-7869-5051-5",
        "Rodney Thompson, Sterling Hershey, Gary Astleford",
    ),
    (
        "Jedi Academy Training Manual",
        "Jedi Academy",
        "Jedi",
        "978-0-7869-5183-3",
        "Rodney Thompson, Eric Cagle, Patrick Stutzman",
    ),
    (
        "Rebellion Era Campaign Guide",
        "Rebellion Era",
        "Rebellion",
        "978-0-7869-4983-0",
        "Rodney Thompson, Sterling Hershey",
    ),
    (
        "Galaxy at War",
        "Galaxy at War",
        "War",
        "978-0-7869-5221-2",
        "Rodney Thompson, Gary Astleford",
    ),
    (
        "Scavenger's Guide to Droids",
        "Scavenger's Guide",
        "Droids",
        "978-0-7869-5230-4",
        "Rodney Thompson, Sterling Hershey",
    ),
    (
        "Galaxy of Intrigue",
        "Galaxy of Intrigue",
        "Intrigue",
        "978-0-7869-5400-1",
        "Rodney Thompson, Gary Astleford, Eric Cagle",
    ),
    (
        "The Unknown Regions",
        "Unknown Regions",
        "Regions",
        "978-0-7869-5399-8",
        "Rodney Thompson, Sterling Hershey, Daniel Wallace",
    ),
];
