//! SQLite schema. Every row is scoped by `workspace_id`; natural-key
//! uniqueness (units by name, actions by name+group, ...) is enforced here
//! because the import engine's skip-on-conflict semantics rely on it.
//! Reference columns are plain TEXT ids — referential closure is the
//! engine's responsibility, not the database's.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS units (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    UNIQUE (workspace_id, name)
);

CREATE TABLE IF NOT EXISTS unit_conversions (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    from_unit_id TEXT NOT NULL,
    to_unit_id TEXT NOT NULL,
    factor REAL NOT NULL,
    UNIQUE (workspace_id, from_unit_id, to_unit_id)
);

CREATE TABLE IF NOT EXISTS ice (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    UNIQUE (workspace_id, name)
);

CREATE TABLE IF NOT EXISTS step_actions (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    action_group TEXT NOT NULL,
    UNIQUE (workspace_id, name, action_group)
);

CREATE TABLE IF NOT EXISTS glasses (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    deposit REAL NOT NULL DEFAULT 0,
    volume REAL,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS garnishes (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    price REAL,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS ingredients (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    short_name TEXT,
    price REAL,
    link TEXT,
    tags TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS ingredient_volumes (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    ingredient_id TEXT NOT NULL,
    unit_id TEXT NOT NULL,
    volume REAL NOT NULL,
    UNIQUE (workspace_id, ingredient_id, unit_id)
);

CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    notes TEXT,
    history TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    price REAL,
    archived INTEGER NOT NULL DEFAULT 0,
    glass_id TEXT,
    ice_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recipe_steps (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    recipe_id TEXT NOT NULL,
    action_id TEXT NOT NULL,
    step_number INTEGER NOT NULL,
    optional INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS recipe_ingredients (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    step_id TEXT NOT NULL,
    ingredient_id TEXT,
    unit_id TEXT,
    amount REAL,
    ingredient_number INTEGER NOT NULL,
    optional INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS recipe_garnishes (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    recipe_id TEXT NOT NULL,
    garnish_id TEXT NOT NULL,
    garnish_number INTEGER NOT NULL,
    optional INTEGER NOT NULL DEFAULT 0,
    alternative INTEGER NOT NULL DEFAULT 0,
    description TEXT,
    UNIQUE (workspace_id, recipe_id, garnish_id)
);

CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    date TEXT,
    archived INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS card_groups (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    card_id TEXT NOT NULL,
    name TEXT NOT NULL,
    group_number INTEGER NOT NULL,
    group_price REAL
);

CREATE TABLE IF NOT EXISTS card_group_items (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    group_id TEXT NOT NULL,
    recipe_id TEXT NOT NULL,
    item_number INTEGER NOT NULL,
    special_price REAL,
    UNIQUE (workspace_id, group_id, recipe_id)
);

CREATE TABLE IF NOT EXISTS calculations (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    show_sales_stuff INTEGER NOT NULL DEFAULT 0,
    ignore_revenue INTEGER NOT NULL DEFAULT 0,
    updated_by_user_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS calculation_items (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    calculation_id TEXT NOT NULL,
    recipe_id TEXT NOT NULL,
    planned_amount INTEGER NOT NULL,
    custom_price REAL,
    UNIQUE (workspace_id, calculation_id, recipe_id)
);

CREATE TABLE IF NOT EXISTS shopping_units (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    calculation_id TEXT NOT NULL,
    ingredient_id TEXT NOT NULL,
    unit_id TEXT NOT NULL,
    checked INTEGER NOT NULL DEFAULT 0,
    UNIQUE (workspace_id, calculation_id, ingredient_id, unit_id)
);

CREATE TABLE IF NOT EXISTS images (
    workspace_id TEXT NOT NULL,
    owner_kind TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (workspace_id, owner_kind, owner_id)
);

CREATE TABLE IF NOT EXISTS settings (
    workspace_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (workspace_id, key)
);

CREATE TABLE IF NOT EXISTS translations (
    workspace_id TEXT NOT NULL,
    language TEXT NOT NULL,
    token TEXT NOT NULL,
    label TEXT NOT NULL,
    PRIMARY KEY (workspace_id, language, token)
);
"#;
