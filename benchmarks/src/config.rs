//! The configuration matrix run by the `contend` binary.

use contend_core::{Configuration, Entry, Synchronous};

/// Read only, write only, read heavy and write heavy sections, in that order.
pub fn default_table() -> Vec<Entry> {
    let wal = Configuration::wal();
    let mut table = vec![Entry::section("Read only")];
    for (readers, conns) in [(1, 1), (1, 0), (10, 1), (10, 0), (100, 0), (100, 1), (100, 2)] {
        table.push(wal.readers(readers).pool_size(conns).into());
    }

    table.push(Entry::section("Write only"));
    table.push(Configuration::rollback().writers(100).into());
    table.push(wal.writers(100).synchronous(Synchronous::Full).into());
    for (writers, conns) in [(1, 1), (1, 0), (10, 1), (10, 0), (100, 1), (100, 0)] {
        table.push(wal.writers(writers).pool_size(conns).into());
    }
    for conns in [1, 0] {
        table.push(wal.writers(100).pool_size(conns).mutex(true).into());
    }

    table.push(Entry::section("Read Heavy"));
    mixed(&mut table, 100, 10);

    table.push(Entry::section("Write Heavy"));
    mixed(&mut table, 10, 100);

    table
}

/// Both pool extremes, each with and without the writer lock.
fn mixed(table: &mut Vec<Entry>, readers: usize, writers: usize) {
    for mutex in [false, true] {
        for conns in [1, 0] {
            table.push(Configuration::wal().readers(readers).writers(writers).pool_size(conns).mutex(mutex).into());
        }
    }
}
