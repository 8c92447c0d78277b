//! In-memory stand-in for the engine
//!
//! `StubEngine` implements the whole flat surface against a small in-memory
//! model: handle bookkeeping, cursors over row vectors, staged metadata
//! result sets and a log of every call made. Individual entry points can be
//! scripted to return a fixed status with no side effects, which is how
//! tests drive warning, error and fault paths.
//!
//! Sessions are only checked by the session lifecycle calls; cursor calls
//! check the table id. Records the engine fills or reads must arrive
//! size-stamped, otherwise the call fails with `INVALID_PARAMETER`.

use super::rows::{self, IndexRow, ObjectRow, Row};
use crate::chars::{self, NativeChar};
use crate::engine::NativeEngine;
use crate::marshal;
use crate::records::{
    NativeColumnDef, NativeColumnList, NativeIndexCreate, NativeIndexCreate1, NativeIndexList,
    NativeObjectList, NativeRecord, NativeTableCreate, NativeUnicodeIndex,
};
use isam_core::status::codes;
use isam_core::{ColumnDefinition, IndexDefinition, IndexInfo, Move, Prep};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{HashMap, HashSet};
use std::ffi::{c_char, CStr};

/// `JET_errInvalidSesid`
pub const INVALID_SESID: i32 = -1104;
/// `JET_errObjectNotFound`
pub const OBJECT_NOT_FOUND: i32 = -1305;
/// `JET_errInvalidTableId`
pub const INVALID_TABLEID: i32 = -1310;
/// `JET_errColumnNotFound`
pub const COLUMN_NOT_FOUND: i32 = -1507;
/// `JET_errUpdateNotPrepared`
pub const UPDATE_NOT_PREPARED: i32 = -1609;
/// `JET_errNotInTransaction`
pub const NOT_IN_TRANSACTION: i32 = -1054;

const TEMP_COLUMNID_BASE: u32 = 0x1000;

/// A temporary-table call as the engine saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempTableCall {
    /// Entry point name
    pub entry_point: &'static str,
    /// Column records, as passed
    pub columns: Vec<NativeColumnDef>,
    /// Numeric locale (`JetOpenTempTable2`)
    pub lcid: Option<u32>,
    /// Normalization descriptor (`JetOpenTempTable3`)
    pub unicode: Option<NativeUnicodeIndex>,
    /// Flags
    pub grbit: u32,
}

/// An index-creation record as the engine saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIndex {
    /// `"legacy"` or `"vista"`
    pub layout: &'static str,
    /// `cb_struct` as declared
    pub declared_size: u32,
    /// Decoded definition
    pub definition: IndexDefinition,
}

/// A table created through `JetCreateTableColumnIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTable {
    /// Table name
    pub name: String,
    /// Decoded columns with the ids the stub assigned
    pub columns: Vec<ColumnDefinition>,
    /// Decoded indexes
    pub indexes: Vec<CreatedIndex>,
}

#[derive(Debug, Default)]
struct StubCursor {
    table: Option<String>,
    rows: Vec<Row>,
    /// -1 is before the first row, `rows.len()` after the last
    pos: isize,
    key: Vec<u8>,
    current_index: Option<String>,
    pending: Option<(Option<usize>, Row)>,
}

impl StubCursor {
    fn over(table: Option<String>, rows: Vec<Row>) -> Self {
        StubCursor {
            table,
            rows,
            pos: -1,
            ..Default::default()
        }
    }

    fn current(&self) -> Option<usize> {
        (self.pos >= 0 && (self.pos as usize) < self.rows.len()).then_some(self.pos as usize)
    }

    fn move_by(&mut self, offset: i32) -> i32 {
        let len = self.rows.len() as isize;
        if offset == Move::First.raw() || offset == Move::Last.raw() {
            if len == 0 {
                self.pos = -1;
                return codes::NO_CURRENT_RECORD;
            }
            self.pos = if offset == Move::First.raw() { 0 } else { len - 1 };
            return 0;
        }
        let target = self.pos + offset as isize;
        if target < 0 {
            self.pos = -1;
            codes::NO_CURRENT_RECORD
        } else if target >= len {
            self.pos = len;
            codes::NO_CURRENT_RECORD
        } else {
            self.pos = target;
            0
        }
    }
}

#[derive(Default)]
struct StubState {
    calls: Vec<&'static str>,
    scripted: HashMap<&'static str, i32>,
    version: u32,
    next_handle: usize,
    instances: HashMap<usize, String>,
    sessions: HashSet<usize>,
    session_contexts: HashMap<usize, usize>,
    transaction_depth: HashMap<usize, u32>,
    parameters: Vec<(u32, usize, Option<String>)>,
    tables: HashMap<String, Vec<Row>>,
    cursors: HashMap<usize, StubCursor>,
    closed_tables: Vec<usize>,
    columns: Vec<ColumnDefinition>,
    index_rows: Vec<IndexRow>,
    objects: Vec<ObjectRow>,
    retrieve_fault: Option<(usize, i32)>,
    retrieve_truncation: Option<u32>,
    temp_tables: Vec<TempTableCall>,
    created_indexes: Vec<CreatedIndex>,
    created_tables: Vec<CreatedTable>,
    added_columns: Vec<ColumnDefinition>,
    next_columnid: u32,
}

impl StubState {
    fn handle(&mut self) -> usize {
        self.next_handle += 1;
        // Distinct from every NIL sentinel.
        0x1000 + self.next_handle
    }

    fn columnid(&mut self) -> u32 {
        self.next_columnid += 1;
        self.next_columnid
    }

    fn open_cursor(&mut self, table: Option<String>, rows: Vec<Row>) -> usize {
        let tableid = self.handle();
        self.cursors.insert(tableid, StubCursor::over(table, rows));
        tableid
    }

    fn column_list(&mut self, wide: bool, list: &mut NativeColumnList) -> i32 {
        if !list.is_stamped() {
            return codes::INVALID_PARAMETER;
        }
        let rows = rows::column_rows(&self.columns, wide);
        let count = rows.len();
        let tableid = self.open_cursor(None, rows);
        *list = rows::column_list(tableid, count);
        0
    }

    fn index_list(&mut self, wide: bool, list: &mut NativeIndexList) -> i32 {
        if !list.is_stamped() {
            return codes::INVALID_PARAMETER;
        }
        let rows = rows::index_rows(&self.index_rows, wide);
        let count = rows.len();
        let tableid = self.open_cursor(None, rows);
        *list = rows::index_list(tableid, count);
        0
    }

    fn object_list(&mut self, wide: bool, objtyp: u32, list: &mut NativeObjectList) -> i32 {
        if !list.is_stamped() {
            return codes::INVALID_PARAMETER;
        }
        let rows = rows::object_rows(&self.objects, objtyp, wide);
        let count = rows.len();
        let tableid = self.open_cursor(None, rows);
        *list = rows::object_list(tableid, count);
        0
    }

    fn open_table(&mut self, name: String, tableid: &mut usize) -> i32 {
        let Some(rows) = self.tables.get(&name).cloned() else {
            return OBJECT_NOT_FOUND;
        };
        *tableid = self.open_cursor(Some(name), rows);
        0
    }

    fn create_table(&mut self, name: String, tableid: &mut usize) -> i32 {
        self.tables.entry(name.clone()).or_default();
        *tableid = self.open_cursor(Some(name), Vec::new());
        0
    }

    fn temp_table(
        &mut self,
        call: TempTableCall,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        if call.columns.len() != columnids.len() || !call.columns.iter().all(|c| c.is_stamped()) {
            return codes::INVALID_PARAMETER;
        }
        for (i, slot) in columnids.iter_mut().enumerate() {
            *slot = TEMP_COLUMNID_BASE + i as u32;
        }
        self.temp_tables.push(call);
        *tableid = self.open_cursor(None, Vec::new());
        0
    }

    fn cursor(&mut self, tableid: usize) -> Option<&mut StubCursor> {
        self.cursors.get_mut(&tableid)
    }

    fn store(&mut self, table: Option<&str>, rows: &[Row]) {
        if let Some(name) = table {
            self.tables.insert(name.to_string(), rows.to_vec());
        }
    }
}

/// Scriptable in-memory engine.
pub struct StubEngine {
    state: Mutex<StubState>,
}

macro_rules! enter {
    ($self:ident, $name:literal) => {
        match $self.enter($name) {
            Ok(state) => state,
            Err(code) => return code,
        }
    };
}

fn ansi_str(text: &CStr) -> String {
    let units: Vec<c_char> = text.to_bytes().iter().map(|&b| b as c_char).collect();
    <c_char as NativeChar>::decode(&units)
}

fn wide_str(text: &[u16]) -> String {
    let end = text.iter().position(|&u| u == 0).unwrap_or(text.len());
    String::from_utf16_lossy(&text[..end])
}

impl StubEngine {
    /// Engine reporting the given raw version
    pub fn new(version: u32) -> Self {
        StubEngine {
            state: Mutex::new(StubState {
                version,
                ..Default::default()
            }),
        }
    }

    /// Engine reporting the given build number
    pub fn with_build(build: u32) -> Self {
        Self::new(build << 8)
    }

    fn enter(&self, name: &'static str) -> std::result::Result<MutexGuard<'_, StubState>, i32> {
        let mut state = self.state.lock();
        state.calls.push(name);
        match state.scripted.get(name) {
            Some(&code) => Err(code),
            None => Ok(state),
        }
    }

    // ---- scripting ------------------------------------------------------

    /// Make `entry_point` return `code` with no side effects
    pub fn script(&self, entry_point: &'static str, code: i32) {
        self.state.lock().scripted.insert(entry_point, code);
    }

    /// Restore normal behaviour of `entry_point`
    pub fn unscript(&self, entry_point: &'static str) {
        self.state.lock().scripted.remove(entry_point);
    }

    /// Change the reported version
    pub fn set_version(&self, version: u32) {
        self.state.lock().version = version;
    }

    /// Let `successes` retrieves through, then fail every later one with `code`
    pub fn fail_retrieve_after(&self, successes: usize, code: i32) {
        self.state.lock().retrieve_fault = Some((successes, code));
    }

    /// Make the next retrieve report truncation with this actual size
    pub fn truncate_next_retrieve(&self, actual: u32) {
        self.state.lock().retrieve_truncation = Some(actual);
    }

    /// Columns served by the column-list calls
    pub fn stage_columns(&self, columns: Vec<ColumnDefinition>) {
        self.state.lock().columns = columns;
    }

    /// Indexes served by the index-list calls
    pub fn stage_indexes(&self, indexes: &[IndexInfo]) {
        self.state.lock().index_rows = indexes.iter().flat_map(IndexRow::expand).collect();
    }

    /// Raw index-list rows, for malformed result sets
    pub fn stage_index_rows(&self, rows: Vec<IndexRow>) {
        self.state.lock().index_rows = rows;
    }

    /// Objects served by the object-list calls
    pub fn stage_objects(&self, objects: Vec<ObjectRow>) {
        self.state.lock().objects = objects;
    }

    /// Rows of a user table
    pub fn stage_table(&self, name: impl Into<String>, rows: Vec<Row>) {
        self.state.lock().tables.insert(name.into(), rows);
    }

    // ---- inspection -----------------------------------------------------

    /// Every entry point called, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    /// Total native calls
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Calls to one entry point
    pub fn count(&self, entry_point: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == entry_point).count()
    }

    /// Forget the call log
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Table ids passed to `JetCloseTable`, in order
    pub fn closed_tables(&self) -> Vec<usize> {
        self.state.lock().closed_tables.clone()
    }

    /// Cursors not yet closed
    pub fn open_cursors(&self) -> usize {
        self.state.lock().cursors.len()
    }

    /// Instances created and not yet terminated
    pub fn live_instances(&self) -> usize {
        self.state.lock().instances.len()
    }

    /// Names of live instances
    pub fn instance_names(&self) -> Vec<String> {
        self.state.lock().instances.values().cloned().collect()
    }

    /// Sessions begun and not yet ended
    pub fn live_sessions(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// System parameters set, as `(paramid, value, text)`
    pub fn parameters(&self) -> Vec<(u32, usize, Option<String>)> {
        self.state.lock().parameters.clone()
    }

    /// Temporary-table calls
    pub fn temp_tables(&self) -> Vec<TempTableCall> {
        self.state.lock().temp_tables.clone()
    }

    /// Index records received
    pub fn created_indexes(&self) -> Vec<CreatedIndex> {
        self.state.lock().created_indexes.clone()
    }

    /// Tables created in one call
    pub fn created_tables(&self) -> Vec<CreatedTable> {
        self.state.lock().created_tables.clone()
    }

    /// Columns added with `JetAddColumn`
    pub fn added_columns(&self) -> Vec<ColumnDefinition> {
        self.state.lock().added_columns.clone()
    }

    /// Rows of a user table
    pub fn table_rows(&self, name: &str) -> Option<Vec<Row>> {
        self.state.lock().tables.get(name).cloned()
    }

    // ---- shared bodies --------------------------------------------------

    fn add_column(
        state: &mut StubState,
        tableid: usize,
        name: String,
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32 {
        if !state.cursors.contains_key(&tableid) {
            return INVALID_TABLEID;
        }
        let Ok(mut column) = marshal::column_from_def(name, def) else {
            return codes::INVALID_PARAMETER;
        };
        let id = state.columnid();
        column.columnid = isam_core::ColumnId::from_raw(id);
        column.default_value = default.to_vec();
        state.added_columns.push(column);
        *columnid = id;
        0
    }

    fn column_info(
        state: &mut StubState,
        tableid: usize,
        column: &str,
        def: &mut NativeColumnDef,
    ) -> i32 {
        if !def.is_stamped() {
            return codes::INVALID_PARAMETER;
        }
        if !state.cursors.contains_key(&tableid) {
            return INVALID_TABLEID;
        }
        match state.columns.iter().find(|c| c.name == column) {
            Some(found) => {
                *def = marshal::column_def(found);
                0
            }
            None => COLUMN_NOT_FOUND,
        }
    }

    unsafe fn create_table_column_index<C: NativeChar, I>(
        state: &mut StubState,
        create: *mut NativeTableCreate<C>,
        decode: unsafe fn(&I) -> Option<CreatedIndex>,
    ) -> i32 {
        let Some(create) = create.as_mut() else {
            return codes::INVALID_PARAMETER;
        };
        if !create.is_stamped() {
            return codes::INVALID_PARAMETER;
        }
        let name = chars::read_nul_terminated(create.table_name);

        let mut columns = Vec::new();
        for i in 0..create.c_columns as usize {
            let record = &mut *create.column_creates.add(i);
            if !record.is_stamped() {
                return codes::INVALID_PARAMETER;
            }
            let Ok(mut column) = marshal::column_from_create(record) else {
                return codes::INVALID_PARAMETER;
            };
            record.columnid = state.columnid();
            record.err = 0;
            column.columnid = isam_core::ColumnId::from_raw(record.columnid);
            columns.push(column);
        }

        let mut indexes = Vec::new();
        let records = create.index_creates as *const I;
        for i in 0..create.c_indexes as usize {
            match decode(&*records.add(i)) {
                Some(index) => indexes.push(index),
                None => return codes::INVALID_PARAMETER,
            }
        }

        create.c_created = 1 + columns.len() as u32 + indexes.len() as u32;
        state.create_table(name.clone(), &mut create.tableid);
        state.created_tables.push(CreatedTable {
            name,
            columns,
            indexes,
        });
        0
    }
}

unsafe fn decode_legacy(record: &NativeIndexCreate<c_char>) -> Option<CreatedIndex> {
    record.is_stamped().then_some(())?;
    Some(CreatedIndex {
        layout: "legacy",
        declared_size: record.declared_size(),
        definition: marshal::index_from_create(record).ok()?,
    })
}

unsafe fn decode_vista(record: &NativeIndexCreate1<u16>) -> Option<CreatedIndex> {
    record.is_stamped().then_some(())?;
    Some(CreatedIndex {
        layout: "vista",
        declared_size: record.declared_size(),
        definition: marshal::index_from_create1(record).ok()?,
    })
}

impl NativeEngine for StubEngine {
    // ---- instance -------------------------------------------------------

    fn create_instance_a(&self, instance: &mut usize, name: &CStr) -> i32 {
        let mut s = enter!(self, "JetCreateInstanceA");
        *instance = s.handle();
        s.instances.insert(*instance, ansi_str(name));
        0
    }

    fn create_instance_w(&self, instance: &mut usize, name: &[u16]) -> i32 {
        let mut s = enter!(self, "JetCreateInstanceW");
        *instance = s.handle();
        s.instances.insert(*instance, wide_str(name));
        0
    }

    fn init(&self, instance: &mut usize) -> i32 {
        let s = enter!(self, "JetInit");
        if s.instances.contains_key(&*instance) {
            0
        } else {
            codes::INVALID_PARAMETER
        }
    }

    fn term(&self, instance: usize) -> i32 {
        let mut s = enter!(self, "JetTerm");
        match s.instances.remove(&instance) {
            Some(_) => 0,
            None => codes::INVALID_PARAMETER,
        }
    }

    fn set_system_parameter_a(
        &self,
        _instance: &mut usize,
        _sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&CStr>,
    ) -> i32 {
        let mut s = enter!(self, "JetSetSystemParameterA");
        s.parameters.push((paramid, value, text.map(ansi_str)));
        0
    }

    fn set_system_parameter_w(
        &self,
        _instance: &mut usize,
        _sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&[u16]>,
    ) -> i32 {
        let mut s = enter!(self, "JetSetSystemParameterW");
        s.parameters.push((paramid, value, text.map(wide_str)));
        0
    }

    // ---- session --------------------------------------------------------

    fn begin_session_a(&self, instance: usize, sesid: &mut usize, _: &CStr, _: &CStr) -> i32 {
        let mut s = enter!(self, "JetBeginSessionA");
        if !s.instances.contains_key(&instance) {
            return codes::INVALID_PARAMETER;
        }
        *sesid = s.handle();
        s.sessions.insert(*sesid);
        0
    }

    fn begin_session_w(&self, instance: usize, sesid: &mut usize, _: &[u16], _: &[u16]) -> i32 {
        let mut s = enter!(self, "JetBeginSessionW");
        if !s.instances.contains_key(&instance) {
            return codes::INVALID_PARAMETER;
        }
        *sesid = s.handle();
        s.sessions.insert(*sesid);
        0
    }

    fn dup_session(&self, sesid: usize, new_sesid: &mut usize) -> i32 {
        let mut s = enter!(self, "JetDupSession");
        if !s.sessions.contains(&sesid) {
            return INVALID_SESID;
        }
        *new_sesid = s.handle();
        s.sessions.insert(*new_sesid);
        0
    }

    fn end_session(&self, sesid: usize, _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetEndSession");
        if s.sessions.remove(&sesid) {
            s.session_contexts.remove(&sesid);
            0
        } else {
            INVALID_SESID
        }
    }

    fn get_version(&self, sesid: usize, version: &mut u32) -> i32 {
        let s = enter!(self, "JetGetVersion");
        if !s.sessions.contains(&sesid) {
            return INVALID_SESID;
        }
        *version = s.version;
        0
    }

    fn set_session_context(&self, sesid: usize, context: usize) -> i32 {
        let mut s = enter!(self, "JetSetSessionContext");
        if !s.sessions.contains(&sesid) {
            return INVALID_SESID;
        }
        s.session_contexts.insert(sesid, context);
        0
    }

    fn reset_session_context(&self, sesid: usize) -> i32 {
        let mut s = enter!(self, "JetResetSessionContext");
        if !s.sessions.contains(&sesid) {
            return INVALID_SESID;
        }
        s.session_contexts.remove(&sesid);
        0
    }

    // ---- database -------------------------------------------------------

    fn create_database_a(&self, _: usize, _: &CStr, dbid: &mut u32, _: u32) -> i32 {
        let mut s = enter!(self, "JetCreateDatabaseA");
        *dbid = s.handle() as u32;
        0
    }

    fn create_database_w(&self, _: usize, _: &[u16], dbid: &mut u32, _: u32) -> i32 {
        let mut s = enter!(self, "JetCreateDatabaseW");
        *dbid = s.handle() as u32;
        0
    }

    fn attach_database_a(&self, _: usize, _: &CStr, _: u32) -> i32 {
        let _s = enter!(self, "JetAttachDatabaseA");
        0
    }

    fn attach_database_w(&self, _: usize, _: &[u16], _: u32) -> i32 {
        let _s = enter!(self, "JetAttachDatabaseW");
        0
    }

    fn detach_database_a(&self, _: usize, _: Option<&CStr>) -> i32 {
        let _s = enter!(self, "JetDetachDatabaseA");
        0
    }

    fn detach_database_w(&self, _: usize, _: Option<&[u16]>) -> i32 {
        let _s = enter!(self, "JetDetachDatabaseW");
        0
    }

    fn open_database_a(&self, _: usize, _: &CStr, dbid: &mut u32, _: u32) -> i32 {
        let mut s = enter!(self, "JetOpenDatabaseA");
        *dbid = s.handle() as u32;
        0
    }

    fn open_database_w(&self, _: usize, _: &[u16], dbid: &mut u32, _: u32) -> i32 {
        let mut s = enter!(self, "JetOpenDatabaseW");
        *dbid = s.handle() as u32;
        0
    }

    fn close_database(&self, _: usize, _: u32, _: u32) -> i32 {
        let _s = enter!(self, "JetCloseDatabase");
        0
    }

    // ---- transactions ---------------------------------------------------

    fn begin_transaction(&self, sesid: usize) -> i32 {
        let mut s = enter!(self, "JetBeginTransaction");
        *s.transaction_depth.entry(sesid).or_default() += 1;
        0
    }

    fn commit_transaction(&self, sesid: usize, _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetCommitTransaction");
        match s.transaction_depth.get_mut(&sesid) {
            Some(depth) if *depth > 0 => {
                *depth -= 1;
                0
            }
            _ => NOT_IN_TRANSACTION,
        }
    }

    fn rollback(&self, sesid: usize, _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetRollback");
        match s.transaction_depth.get_mut(&sesid) {
            Some(depth) if *depth > 0 => {
                *depth -= 1;
                0
            }
            _ => NOT_IN_TRANSACTION,
        }
    }

    // ---- DDL ------------------------------------------------------------

    fn create_table_a(&self, _: usize, _: u32, name: &CStr, _: u32, _: u32, tableid: &mut usize) -> i32 {
        let mut s = enter!(self, "JetCreateTableA");
        s.create_table(ansi_str(name), tableid)
    }

    fn create_table_w(&self, _: usize, _: u32, name: &[u16], _: u32, _: u32, tableid: &mut usize) -> i32 {
        let mut s = enter!(self, "JetCreateTableW");
        s.create_table(wide_str(name), tableid)
    }

    fn open_table_a(&self, _: usize, _: u32, name: &CStr, _: u32, tableid: &mut usize) -> i32 {
        let mut s = enter!(self, "JetOpenTableA");
        s.open_table(ansi_str(name), tableid)
    }

    fn open_table_w(&self, _: usize, _: u32, name: &[u16], _: u32, tableid: &mut usize) -> i32 {
        let mut s = enter!(self, "JetOpenTableW");
        s.open_table(wide_str(name), tableid)
    }

    fn close_table(&self, _: usize, tableid: usize) -> i32 {
        let mut s = enter!(self, "JetCloseTable");
        match s.cursors.remove(&tableid) {
            Some(_) => {
                s.closed_tables.push(tableid);
                0
            }
            None => INVALID_TABLEID,
        }
    }

    fn delete_table_a(&self, _: usize, _: u32, name: &CStr) -> i32 {
        let mut s = enter!(self, "JetDeleteTableA");
        match s.tables.remove(&ansi_str(name)) {
            Some(_) => 0,
            None => OBJECT_NOT_FOUND,
        }
    }

    fn delete_table_w(&self, _: usize, _: u32, name: &[u16]) -> i32 {
        let mut s = enter!(self, "JetDeleteTableW");
        match s.tables.remove(&wide_str(name)) {
            Some(_) => 0,
            None => OBJECT_NOT_FOUND,
        }
    }

    fn add_column_a(
        &self,
        _: usize,
        tableid: usize,
        name: &CStr,
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32 {
        let mut s = enter!(self, "JetAddColumnA");
        Self::add_column(&mut s, tableid, ansi_str(name), def, default, columnid)
    }

    fn add_column_w(
        &self,
        _: usize,
        tableid: usize,
        name: &[u16],
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32 {
        let mut s = enter!(self, "JetAddColumnW");
        Self::add_column(&mut s, tableid, wide_str(name), def, default, columnid)
    }

    fn delete_column_a(&self, _: usize, tableid: usize, _: &CStr) -> i32 {
        let s = enter!(self, "JetDeleteColumnA");
        if s.cursors.contains_key(&tableid) { 0 } else { INVALID_TABLEID }
    }

    fn delete_column_w(&self, _: usize, tableid: usize, _: &[u16]) -> i32 {
        let s = enter!(self, "JetDeleteColumnW");
        if s.cursors.contains_key(&tableid) { 0 } else { INVALID_TABLEID }
    }

    fn get_table_column_info_a(
        &self,
        _: usize,
        tableid: usize,
        column: &CStr,
        def: &mut NativeColumnDef,
    ) -> i32 {
        let mut s = enter!(self, "JetGetTableColumnInfoA");
        Self::column_info(&mut s, tableid, &ansi_str(column), def)
    }

    fn get_table_column_info_w(
        &self,
        _: usize,
        tableid: usize,
        column: &[u16],
        def: &mut NativeColumnDef,
    ) -> i32 {
        let mut s = enter!(self, "JetGetTableColumnInfoW");
        Self::column_info(&mut s, tableid, &wide_str(column), def)
    }

    unsafe fn create_index2_a(
        &self,
        _: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate<c_char>,
        count: u32,
    ) -> i32 {
        let mut s = enter!(self, "JetCreateIndex2A");
        if !s.cursors.contains_key(&tableid) {
            return INVALID_TABLEID;
        }
        for i in 0..count as usize {
            match decode_legacy(&*indexes.add(i)) {
                Some(index) => s.created_indexes.push(index),
                None => return codes::INVALID_PARAMETER,
            }
        }
        0
    }

    unsafe fn create_index2_w(
        &self,
        _: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate1<u16>,
        count: u32,
    ) -> i32 {
        let mut s = enter!(self, "JetCreateIndex2W");
        if !s.cursors.contains_key(&tableid) {
            return INVALID_TABLEID;
        }
        for i in 0..count as usize {
            match decode_vista(&*indexes.add(i)) {
                Some(index) => s.created_indexes.push(index),
                None => return codes::INVALID_PARAMETER,
            }
        }
        0
    }

    fn delete_index_a(&self, _: usize, tableid: usize, _: &CStr) -> i32 {
        let s = enter!(self, "JetDeleteIndexA");
        if s.cursors.contains_key(&tableid) { 0 } else { INVALID_TABLEID }
    }

    fn delete_index_w(&self, _: usize, tableid: usize, _: &[u16]) -> i32 {
        let s = enter!(self, "JetDeleteIndexW");
        if s.cursors.contains_key(&tableid) { 0 } else { INVALID_TABLEID }
    }

    unsafe fn create_table_column_index_a(
        &self,
        _: usize,
        _: u32,
        create: *mut NativeTableCreate<c_char>,
    ) -> i32 {
        let mut s = enter!(self, "JetCreateTableColumnIndexA");
        Self::create_table_column_index(&mut s, create, decode_legacy)
    }

    unsafe fn create_table_column_index_w(
        &self,
        _: usize,
        _: u32,
        create: *mut NativeTableCreate<u16>,
    ) -> i32 {
        let mut s = enter!(self, "JetCreateTableColumnIndexW");
        Self::create_table_column_index(&mut s, create, decode_vista)
    }

    // ---- introspection --------------------------------------------------

    fn get_table_column_info_list_a(&self, _: usize, _: usize, list: &mut NativeColumnList) -> i32 {
        let mut s = enter!(self, "JetGetTableColumnInfoListA");
        s.column_list(false, list)
    }

    fn get_table_column_info_list_w(&self, _: usize, _: usize, list: &mut NativeColumnList) -> i32 {
        let mut s = enter!(self, "JetGetTableColumnInfoListW");
        s.column_list(true, list)
    }

    fn get_column_info_list_a(&self, _: usize, _: u32, _: &CStr, list: &mut NativeColumnList) -> i32 {
        let mut s = enter!(self, "JetGetColumnInfoListA");
        s.column_list(false, list)
    }

    fn get_column_info_list_w(&self, _: usize, _: u32, _: &[u16], list: &mut NativeColumnList) -> i32 {
        let mut s = enter!(self, "JetGetColumnInfoListW");
        s.column_list(true, list)
    }

    fn get_table_index_info_list_a(
        &self,
        _: usize,
        _: usize,
        _: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let mut s = enter!(self, "JetGetTableIndexInfoListA");
        s.index_list(false, list)
    }

    fn get_table_index_info_list_w(
        &self,
        _: usize,
        _: usize,
        _: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let mut s = enter!(self, "JetGetTableIndexInfoListW");
        s.index_list(true, list)
    }

    fn get_index_info_list_a(
        &self,
        _: usize,
        _: u32,
        _: &CStr,
        _: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let mut s = enter!(self, "JetGetIndexInfoListA");
        s.index_list(false, list)
    }

    fn get_index_info_list_w(
        &self,
        _: usize,
        _: u32,
        _: &[u16],
        _: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let mut s = enter!(self, "JetGetIndexInfoListW");
        s.index_list(true, list)
    }

    fn get_object_info_list_a(&self, _: usize, _: u32, objtyp: u32, list: &mut NativeObjectList) -> i32 {
        let mut s = enter!(self, "JetGetObjectInfoListA");
        s.object_list(false, objtyp, list)
    }

    fn get_object_info_list_w(&self, _: usize, _: u32, objtyp: u32, list: &mut NativeObjectList) -> i32 {
        let mut s = enter!(self, "JetGetObjectInfoListW");
        s.object_list(true, objtyp, list)
    }

    // ---- temporary tables -----------------------------------------------

    fn open_temp_table(
        &self,
        _: usize,
        columns: &[NativeColumnDef],
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        let mut s = enter!(self, "JetOpenTempTable");
        let call = TempTableCall {
            entry_point: "JetOpenTempTable",
            columns: columns.to_vec(),
            lcid: None,
            unicode: None,
            grbit,
        };
        s.temp_table(call, tableid, columnids)
    }

    fn open_temp_table2(
        &self,
        _: usize,
        columns: &[NativeColumnDef],
        lcid: u32,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        let mut s = enter!(self, "JetOpenTempTable2");
        let call = TempTableCall {
            entry_point: "JetOpenTempTable2",
            columns: columns.to_vec(),
            lcid: Some(lcid),
            unicode: None,
            grbit,
        };
        s.temp_table(call, tableid, columnids)
    }

    unsafe fn open_temp_table3(
        &self,
        _: usize,
        columns: &[NativeColumnDef],
        unicode: *const NativeUnicodeIndex,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        let mut s = enter!(self, "JetOpenTempTable3");
        let call = TempTableCall {
            entry_point: "JetOpenTempTable3",
            columns: columns.to_vec(),
            lcid: None,
            unicode: unicode.as_ref().copied(),
            grbit,
        };
        s.temp_table(call, tableid, columnids)
    }

    // ---- records --------------------------------------------------------

    fn move_cursor(&self, _: usize, tableid: usize, offset: i32, _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetMove");
        match s.cursor(tableid) {
            Some(cursor) => cursor.move_by(offset),
            None => INVALID_TABLEID,
        }
    }

    fn make_key(&self, _: usize, tableid: usize, data: &[u8], _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetMakeKey");
        match s.cursor(tableid) {
            Some(cursor) => {
                cursor.key = data.to_vec();
                0
            }
            None => INVALID_TABLEID,
        }
    }

    /// Positions on the first row holding the key in any column.
    fn seek(&self, _: usize, tableid: usize, _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetSeek");
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        let key = cursor.key.clone();
        match cursor.rows.iter().position(|row| row.values().any(|v| *v == key)) {
            Some(i) => {
                cursor.pos = i as isize;
                0
            }
            None => codes::RECORD_NOT_FOUND,
        }
    }

    fn set_current_index_a(&self, _: usize, tableid: usize, index: Option<&CStr>) -> i32 {
        let mut s = enter!(self, "JetSetCurrentIndexA");
        match s.cursor(tableid) {
            Some(cursor) => {
                cursor.current_index = index.map(ansi_str);
                cursor.pos = -1;
                0
            }
            None => INVALID_TABLEID,
        }
    }

    fn set_current_index_w(&self, _: usize, tableid: usize, index: Option<&[u16]>) -> i32 {
        let mut s = enter!(self, "JetSetCurrentIndexW");
        match s.cursor(tableid) {
            Some(cursor) => {
                cursor.current_index = index.map(wide_str);
                cursor.pos = -1;
                0
            }
            None => INVALID_TABLEID,
        }
    }

    fn prepare_update(&self, _: usize, tableid: usize, prep: u32) -> i32 {
        let mut s = enter!(self, "JetPrepareUpdate");
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        let current = cursor.current();
        cursor.pending = if prep == Prep::Insert.raw() {
            Some((None, Row::new()))
        } else if prep == Prep::Cancel.raw() {
            None
        } else if prep == Prep::InsertCopy.raw() {
            let Some(i) = current else {
                return codes::NO_CURRENT_RECORD;
            };
            Some((None, cursor.rows[i].clone()))
        } else if prep == Prep::Replace.raw() || prep == Prep::ReplaceNoLock.raw() {
            let Some(i) = current else {
                return codes::NO_CURRENT_RECORD;
            };
            Some((Some(i), cursor.rows[i].clone()))
        } else {
            return codes::INVALID_PARAMETER;
        };
        0
    }

    fn update(&self, _: usize, tableid: usize, bookmark: &mut [u8], actual: &mut u32) -> i32 {
        let mut s = enter!(self, "JetUpdate");
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        let Some((target, row)) = cursor.pending.take() else {
            return UPDATE_NOT_PREPARED;
        };
        let position = match target {
            Some(i) => {
                cursor.rows[i] = row;
                i
            }
            None => {
                cursor.rows.push(row);
                cursor.rows.len() - 1
            }
        };
        let mark = (position as u32).to_le_bytes();
        let n = bookmark.len().min(mark.len());
        bookmark[..n].copy_from_slice(&mark[..n]);
        *actual = mark.len() as u32;

        let table = cursor.table.clone();
        let rows = cursor.rows.clone();
        s.store(table.as_deref(), &rows);
        0
    }

    fn delete(&self, _: usize, tableid: usize) -> i32 {
        let mut s = enter!(self, "JetDelete");
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        let Some(i) = cursor.current() else {
            return codes::NO_CURRENT_RECORD;
        };
        cursor.rows.remove(i);
        cursor.pos = i as isize - 1;

        let table = cursor.table.clone();
        let rows = cursor.rows.clone();
        s.store(table.as_deref(), &rows);
        0
    }

    fn set_column(&self, _: usize, tableid: usize, columnid: u32, data: &[u8], _grbit: u32) -> i32 {
        let mut s = enter!(self, "JetSetColumn");
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        match cursor.pending.as_mut() {
            Some((_, row)) => {
                row.insert(columnid, data.to_vec());
                0
            }
            None => UPDATE_NOT_PREPARED,
        }
    }

    fn retrieve_column(
        &self,
        _: usize,
        tableid: usize,
        columnid: u32,
        data: &mut [u8],
        actual: &mut u32,
        _grbit: u32,
    ) -> i32 {
        let mut s = enter!(self, "JetRetrieveColumn");
        if let Some((remaining, code)) = s.retrieve_fault.as_mut() {
            if *remaining == 0 {
                return *code;
            }
            *remaining -= 1;
        }
        if let Some(reported) = s.retrieve_truncation.take() {
            *actual = reported;
            return codes::BUFFER_TRUNCATED;
        }
        let Some(cursor) = s.cursor(tableid) else {
            return INVALID_TABLEID;
        };
        let Some(i) = cursor.current() else {
            return codes::NO_CURRENT_RECORD;
        };
        let Some(value) = cursor.rows[i].get(&columnid) else {
            *actual = 0;
            return codes::COLUMN_NULL;
        };
        let n = value.len().min(data.len());
        data[..n].copy_from_slice(&value[..n]);
        *actual = value.len() as u32;
        if value.len() > data.len() {
            codes::BUFFER_TRUNCATED
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rows::le32;

    #[test]
    fn scripted_entry_point_has_no_side_effects() {
        let stub = StubEngine::with_build(6000);
        stub.script("JetCreateInstanceA", -1);

        let mut instance = 0;
        let name = std::ffi::CString::new("x").unwrap();
        assert_eq!(stub.create_instance_a(&mut instance, &name), -1);
        assert_eq!(instance, 0);
        assert_eq!(stub.live_instances(), 0);
        assert_eq!(stub.calls(), vec!["JetCreateInstanceA"]);
    }

    #[test]
    fn cursor_moves_and_reports_ends() {
        let stub = StubEngine::with_build(6000);
        stub.stage_table("t", vec![Row::from([(1, le32(10))]), Row::from([(1, le32(20))])]);

        let mut tableid = 0;
        assert_eq!(stub.open_table_w(1, 1, &[b't' as u16, 0], 0, &mut tableid), 0);
        assert_eq!(stub.move_cursor(1, tableid, Move::Previous.raw(), 0), codes::NO_CURRENT_RECORD);
        assert_eq!(stub.move_cursor(1, tableid, Move::Next.raw(), 0), 0);
        assert_eq!(stub.move_cursor(1, tableid, Move::Next.raw(), 0), 0);
        assert_eq!(stub.move_cursor(1, tableid, Move::Next.raw(), 0), codes::NO_CURRENT_RECORD);
        assert_eq!(stub.move_cursor(1, tableid, Move::First.raw(), 0), 0);

        let mut buf = [0u8; 2];
        let mut actual = 0;
        assert_eq!(
            stub.retrieve_column(1, tableid, 1, &mut buf, &mut actual, 0),
            codes::BUFFER_TRUNCATED
        );
        assert_eq!(actual, 4);
        assert_eq!(
            stub.retrieve_column(1, tableid, 2, &mut buf, &mut actual, 0),
            codes::COLUMN_NULL
        );
    }

    #[test]
    fn insert_appends_to_table() {
        let stub = StubEngine::with_build(6000);
        let mut tableid = 0;
        let name = std::ffi::CString::new("t").unwrap();
        assert_eq!(stub.create_table_a(1, 1, &name, 0, 0, &mut tableid), 0);
        assert_eq!(stub.set_column(1, tableid, 1, b"v", 0), UPDATE_NOT_PREPARED);
        assert_eq!(stub.prepare_update(1, tableid, Prep::Insert.raw()), 0);
        assert_eq!(stub.set_column(1, tableid, 1, b"v", 0), 0);
        let mut actual = 0;
        assert_eq!(stub.update(1, tableid, &mut [], &mut actual), 0);
        assert_eq!(stub.table_rows("t").unwrap().len(), 1);
    }
}
