mod m0001_initial;
mod m0002_jobs_and_chunks;
mod m0003_moderation;
mod m0004_banned_words_and_rag;

use cetane::prelude::MigrationRegistry;

pub fn registry() -> MigrationRegistry {
    let mut reg = MigrationRegistry::new();
    reg.register(m0001_initial::migration());
    reg.register(m0002_jobs_and_chunks::migration());
    reg.register(m0003_moderation::migration());
    reg.register(m0004_banned_words_and_rag::migration());
    reg
}
