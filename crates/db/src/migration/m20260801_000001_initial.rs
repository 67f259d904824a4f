//! Initial database migration.
//!
//! Creates the versioned ledger tables, enums, immutability triggers and
//! reference-data seed rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: LEDGER TABLES
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(ENTRY_ATTACHMENTS_SQL).await?;
        db.execute_unprepared(LEDGER_SETTINGS_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 4: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Entry kind
CREATE TYPE ledger_kind AS ENUM ('expense', 'fuel');

-- Monetary direction
CREATE TYPE transaction_type AS ENUM ('credit', 'debit');

-- Approval state machine
CREATE TYPE approval_status AS ENUM (
    'pending',
    'approved',
    'rejected',
    'cancelled'
);

-- How the entry came into being
CREATE TYPE entry_origin AS ENUM ('manual', 'forced', 'settlement');
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    original_entry_id UUID NOT NULL,
    parent_entry_id UUID REFERENCES ledger_entries(id),
    version_number INTEGER NOT NULL DEFAULT 1,
    is_active BOOLEAN NOT NULL DEFAULT true,
    kind ledger_kind NOT NULL,
    transaction_type transaction_type NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    entry_date DATE NOT NULL,
    category VARCHAR(100) NOT NULL,
    payment_mode VARCHAR(100) NOT NULL,
    description TEXT,
    odometer NUMERIC(19, 4),
    subject_id UUID NOT NULL,
    origin entry_origin NOT NULL DEFAULT 'manual',
    approval_status approval_status NOT NULL DEFAULT 'pending',
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    approval_reason TEXT,
    edit_reason TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_by UUID,
    deleted_at TIMESTAMPTZ,

    CONSTRAINT chk_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT chk_version_positive CHECK (version_number >= 1),
    CONSTRAINT chk_parent_link CHECK ((version_number = 1) = (parent_entry_id IS NULL)),
    CONSTRAINT chk_root_original CHECK (version_number > 1 OR original_entry_id = id),
    CONSTRAINT chk_odometer_kind CHECK (
        (kind = 'fuel' AND odometer IS NOT NULL)
        OR (kind = 'expense' AND odometer IS NULL)
    )
);

CREATE INDEX idx_ledger_entries_chain ON ledger_entries(original_entry_id, version_number);
CREATE UNIQUE INDEX uq_ledger_entries_active ON ledger_entries(original_entry_id) WHERE is_active = true;
CREATE INDEX idx_ledger_entries_subject_date ON ledger_entries(subject_id, entry_date DESC) WHERE is_active = true;
CREATE INDEX idx_ledger_entries_status ON ledger_entries(approval_status) WHERE is_active = true;
CREATE INDEX idx_ledger_entries_entry_date ON ledger_entries(entry_date) WHERE is_active = true;
";

const ENTRY_ATTACHMENTS_SQL: &str = r"
CREATE TABLE entry_attachments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    original_entry_id UUID NOT NULL,
    file_key VARCHAR(500) NOT NULL,
    uploaded_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_entry_attachments_key UNIQUE (original_entry_id, file_key)
);
";

const LEDGER_SETTINGS_SQL: &str = r"
CREATE TABLE ledger_settings (
    key VARCHAR(100) PRIMARY KEY,
    value JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on settings rows
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at := now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_ledger_settings_updated_at
BEFORE UPDATE ON ledger_settings
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

-- ============================================================
-- FUNCTION: prevent_retired_version_mod
-- Superseded versions and soft-deleted entries are immutable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_retired_version_mod()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.is_active = false THEN
        RAISE EXCEPTION 'Superseded ledger entry versions cannot be modified';
    END IF;

    IF OLD.deleted_at IS NOT NULL THEN
        RAISE EXCEPTION 'Deleted ledger entries cannot be modified';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_retired_mod
BEFORE UPDATE ON ledger_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_retired_version_mod();
";

const SEED_SETTINGS_SQL: &str = r#"
INSERT INTO ledger_settings (key, value) VALUES
    ('ledger.categories', '["FUEL", "MAINTENANCE", "TOLL", "PARKING", "SUPPLIES", "MISC"]'::jsonb),
    ('ledger.payment_modes', '["CASH", "CARD", "UPI", "BANK_TRANSFER"]'::jsonb)
ON CONFLICT (key) DO NOTHING;
"#;

const DROP_ALL_SQL: &str = r"
-- Triggers
DROP TRIGGER IF EXISTS trg_prevent_retired_mod ON ledger_entries;
DROP TRIGGER IF EXISTS trg_ledger_settings_updated_at ON ledger_settings;

-- Functions
DROP FUNCTION IF EXISTS prevent_retired_version_mod();
DROP FUNCTION IF EXISTS set_updated_at();

-- Tables (reverse dependency order)
DROP TABLE IF EXISTS entry_attachments;
DROP TABLE IF EXISTS ledger_settings;
DROP TABLE IF EXISTS ledger_entries;

-- Enums
DROP TYPE IF EXISTS entry_origin;
DROP TYPE IF EXISTS approval_status;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS ledger_kind;
";
