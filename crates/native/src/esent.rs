//! Binding to the system engine (`esent.dll`)
//!
//! The library is loaded at runtime and every export is resolved once, when
//! [`Esent::load`] runs. An export the loaded engine lacks does not stop the
//! load: calls to it return [`codes::FEATURE_NOT_AVAILABLE`] without
//! reaching the engine, so older builds can still be probed.
//!
//! Otherwise a thin pass-through: every method forwards its arguments to the
//! matching export and returns the status untouched. Empty slices are passed
//! as null pointers.

use crate::dl::DynLib;
use crate::engine::NativeEngine;
use crate::records::{
    info_level, NativeColumnDef, NativeColumnList, NativeIndexCreate, NativeIndexCreate1,
    NativeIndexList, NativeObjectList, NativeRecord, NativeTableCreate, NativeUnicodeIndex,
};
use isam_core::status::codes;
use isam_core::{Error, Result};
use std::ffi::{c_char, c_void, CStr};
use std::fmt;
use std::mem;
use std::ptr;
use tracing::{debug, info};

const LIBRARY: &[u8] = b"esent.dll\0";

/// Declares the export table: one optional function pointer per entry
/// point, resolved by name from the loaded library.
macro_rules! exports {
    ($(fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> i32;)*) => {
        #[allow(non_snake_case)]
        #[derive(Default)]
        struct Exports {
            $($name: Option<unsafe extern "system" fn($($ty),*) -> i32>,)*
        }

        impl Exports {
            fn resolve(lib: &DynLib) -> Self {
                Self {
                    $($name: lookup(lib, concat!(stringify!($name), "\0")).map(|ptr| {
                        // SAFETY: the export has the signature declared for it.
                        unsafe {
                            mem::transmute::<*mut c_void, unsafe extern "system" fn($($ty),*) -> i32>(ptr)
                        }
                    }),)*
                }
            }

            fn missing(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $(if self.$name.is_none() {
                    missing.push(stringify!($name));
                })*
                missing
            }
        }
    };
}

/// Calls a resolved export, or reports it unavailable.
macro_rules! call {
    ($engine:expr, $name:ident($($arg:expr),* $(,)?)) => {
        match $engine.exports.$name {
            Some(export) => unsafe { export($($arg),*) },
            None => unavailable(stringify!($name)),
        }
    };
}

fn lookup(lib: &DynLib, name: &'static str) -> Option<*mut c_void> {
    let symbol = CStr::from_bytes_with_nul(name.as_bytes()).ok()?;
    // SAFETY: the pointer is only ever cast to the export's declared signature.
    unsafe { lib.sym(symbol) }
}

fn unavailable(export: &'static str) -> i32 {
    debug!(target: "isam::native", export, "Export not present in loaded engine");
    codes::FEATURE_NOT_AVAILABLE
}

/// The engine shipped with Windows.
pub struct Esent {
    exports: Exports,
    _lib: DynLib,
}

impl Esent {
    /// Load `esent.dll` and resolve its exports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the library cannot be loaded. Missing
    /// exports are not an error.
    pub fn load() -> Result<Self> {
        let name = CStr::from_bytes_with_nul(LIBRARY)
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        let lib = DynLib::open(name)?;
        let exports = Exports::resolve(&lib);

        let missing = exports.missing();
        info!(
            target: "isam::native",
            missing = missing.len(),
            "Loaded esent.dll"
        );
        if !missing.is_empty() {
            debug!(target: "isam::native", ?missing, "Unresolved exports");
        }
        Ok(Self { exports, _lib: lib })
    }
}

impl fmt::Debug for Esent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Esent")
            .field("missing", &self.exports.missing())
            .finish_non_exhaustive()
    }
}

fn opt_a(text: Option<&CStr>) -> *const c_char {
    text.map_or(ptr::null(), CStr::as_ptr)
}

fn opt_w(text: Option<&[u16]>) -> *const u16 {
    text.map_or(ptr::null(), <[u16]>::as_ptr)
}

fn data(bytes: &[u8]) -> *const c_void {
    if bytes.is_empty() {
        ptr::null()
    } else {
        bytes.as_ptr() as *const c_void
    }
}

fn data_mut(bytes: &mut [u8]) -> *mut c_void {
    if bytes.is_empty() {
        ptr::null_mut()
    } else {
        bytes.as_mut_ptr() as *mut c_void
    }
}

fn size_of_val<T>(_: &mut T) -> u32 {
    mem::size_of::<T>() as u32
}

// SAFETY (all methods below): each export was resolved with its declared
// signature; arguments are either plain values, references that outlive the
// call, or raw pointers whose validity the caller of the `unsafe` trait
// methods guarantees.
impl NativeEngine for Esent {
    fn create_instance_a(&self, instance: &mut usize, name: &CStr) -> i32 {
        call!(self, JetCreateInstanceA(instance, name.as_ptr()))
    }

    fn create_instance_w(&self, instance: &mut usize, name: &[u16]) -> i32 {
        call!(self, JetCreateInstanceW(instance, name.as_ptr()))
    }

    fn init(&self, instance: &mut usize) -> i32 {
        call!(self, JetInit(instance))
    }

    fn term(&self, instance: usize) -> i32 {
        call!(self, JetTerm(instance))
    }

    fn set_system_parameter_a(
        &self,
        instance: &mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&CStr>,
    ) -> i32 {
        call!(self, JetSetSystemParameterA(instance, sesid, paramid, value, opt_a(text)))
    }

    fn set_system_parameter_w(
        &self,
        instance: &mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&[u16]>,
    ) -> i32 {
        call!(self, JetSetSystemParameterW(instance, sesid, paramid, value, opt_w(text)))
    }

    fn begin_session_a(&self, instance: usize, sesid: &mut usize, user: &CStr, password: &CStr) -> i32 {
        call!(self, JetBeginSessionA(instance, sesid, user.as_ptr(), password.as_ptr()))
    }

    fn begin_session_w(&self, instance: usize, sesid: &mut usize, user: &[u16], password: &[u16]) -> i32 {
        call!(self, JetBeginSessionW(instance, sesid, user.as_ptr(), password.as_ptr()))
    }

    fn dup_session(&self, sesid: usize, new_sesid: &mut usize) -> i32 {
        call!(self, JetDupSession(sesid, new_sesid))
    }

    fn end_session(&self, sesid: usize, grbit: u32) -> i32 {
        call!(self, JetEndSession(sesid, grbit))
    }

    fn get_version(&self, sesid: usize, version: &mut u32) -> i32 {
        call!(self, JetGetVersion(sesid, version))
    }

    fn set_session_context(&self, sesid: usize, context: usize) -> i32 {
        call!(self, JetSetSessionContext(sesid, context))
    }

    fn reset_session_context(&self, sesid: usize) -> i32 {
        call!(self, JetResetSessionContext(sesid))
    }

    fn create_database_a(&self, sesid: usize, path: &CStr, dbid: &mut u32, grbit: u32) -> i32 {
        call!(self, JetCreateDatabaseA(sesid, path.as_ptr(), ptr::null(), dbid, grbit))
    }

    fn create_database_w(&self, sesid: usize, path: &[u16], dbid: &mut u32, grbit: u32) -> i32 {
        call!(self, JetCreateDatabaseW(sesid, path.as_ptr(), ptr::null(), dbid, grbit))
    }

    fn attach_database_a(&self, sesid: usize, path: &CStr, grbit: u32) -> i32 {
        call!(self, JetAttachDatabaseA(sesid, path.as_ptr(), grbit))
    }

    fn attach_database_w(&self, sesid: usize, path: &[u16], grbit: u32) -> i32 {
        call!(self, JetAttachDatabaseW(sesid, path.as_ptr(), grbit))
    }

    fn detach_database_a(&self, sesid: usize, path: Option<&CStr>) -> i32 {
        call!(self, JetDetachDatabaseA(sesid, opt_a(path)))
    }

    fn detach_database_w(&self, sesid: usize, path: Option<&[u16]>) -> i32 {
        call!(self, JetDetachDatabaseW(sesid, opt_w(path)))
    }

    fn open_database_a(&self, sesid: usize, path: &CStr, dbid: &mut u32, grbit: u32) -> i32 {
        call!(self, JetOpenDatabaseA(sesid, path.as_ptr(), ptr::null(), dbid, grbit))
    }

    fn open_database_w(&self, sesid: usize, path: &[u16], dbid: &mut u32, grbit: u32) -> i32 {
        call!(self, JetOpenDatabaseW(sesid, path.as_ptr(), ptr::null(), dbid, grbit))
    }

    fn close_database(&self, sesid: usize, dbid: u32, grbit: u32) -> i32 {
        call!(self, JetCloseDatabase(sesid, dbid, grbit))
    }

    fn begin_transaction(&self, sesid: usize) -> i32 {
        call!(self, JetBeginTransaction(sesid))
    }

    fn commit_transaction(&self, sesid: usize, grbit: u32) -> i32 {
        call!(self, JetCommitTransaction(sesid, grbit))
    }

    fn rollback(&self, sesid: usize, grbit: u32) -> i32 {
        call!(self, JetRollback(sesid, grbit))
    }

    fn create_table_a(
        &self,
        sesid: usize,
        dbid: u32,
        name: &CStr,
        pages: u32,
        density: u32,
        tableid: &mut usize,
    ) -> i32 {
        call!(self, JetCreateTableA(sesid, dbid, name.as_ptr(), pages, density, tableid))
    }

    fn create_table_w(
        &self,
        sesid: usize,
        dbid: u32,
        name: &[u16],
        pages: u32,
        density: u32,
        tableid: &mut usize,
    ) -> i32 {
        call!(self, JetCreateTableW(sesid, dbid, name.as_ptr(), pages, density, tableid))
    }

    fn open_table_a(&self, sesid: usize, dbid: u32, name: &CStr, grbit: u32, tableid: &mut usize) -> i32 {
        call!(self, JetOpenTableA(sesid, dbid, name.as_ptr(), ptr::null(), 0, grbit, tableid))
    }

    fn open_table_w(&self, sesid: usize, dbid: u32, name: &[u16], grbit: u32, tableid: &mut usize) -> i32 {
        call!(self, JetOpenTableW(sesid, dbid, name.as_ptr(), ptr::null(), 0, grbit, tableid))
    }

    fn close_table(&self, sesid: usize, tableid: usize) -> i32 {
        call!(self, JetCloseTable(sesid, tableid))
    }

    fn delete_table_a(&self, sesid: usize, dbid: u32, name: &CStr) -> i32 {
        call!(self, JetDeleteTableA(sesid, dbid, name.as_ptr()))
    }

    fn delete_table_w(&self, sesid: usize, dbid: u32, name: &[u16]) -> i32 {
        call!(self, JetDeleteTableW(sesid, dbid, name.as_ptr()))
    }

    fn add_column_a(
        &self,
        sesid: usize,
        tableid: usize,
        name: &CStr,
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32 {
        call!(self, JetAddColumnA(
            sesid,
            tableid,
            name.as_ptr(),
            def,
            data(default),
            default.len() as u32,
            columnid,
        ))
    }

    fn add_column_w(
        &self,
        sesid: usize,
        tableid: usize,
        name: &[u16],
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32 {
        call!(self, JetAddColumnW(
            sesid,
            tableid,
            name.as_ptr(),
            def,
            data(default),
            default.len() as u32,
            columnid,
        ))
    }

    fn delete_column_a(&self, sesid: usize, tableid: usize, name: &CStr) -> i32 {
        call!(self, JetDeleteColumnA(sesid, tableid, name.as_ptr()))
    }

    fn delete_column_w(&self, sesid: usize, tableid: usize, name: &[u16]) -> i32 {
        call!(self, JetDeleteColumnW(sesid, tableid, name.as_ptr()))
    }

    fn get_table_column_info_a(
        &self,
        sesid: usize,
        tableid: usize,
        column: &CStr,
        def: &mut NativeColumnDef,
    ) -> i32 {
        let size = NativeColumnDef::SIZE;
        call!(self, JetGetTableColumnInfoA(
            sesid,
            tableid,
            column.as_ptr(),
            def as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO,
        ))
    }

    fn get_table_column_info_w(
        &self,
        sesid: usize,
        tableid: usize,
        column: &[u16],
        def: &mut NativeColumnDef,
    ) -> i32 {
        let size = NativeColumnDef::SIZE;
        call!(self, JetGetTableColumnInfoW(
            sesid,
            tableid,
            column.as_ptr(),
            def as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO,
        ))
    }

    unsafe fn create_index2_a(
        &self,
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate<c_char>,
        count: u32,
    ) -> i32 {
        call!(self, JetCreateIndex2A(sesid, tableid, indexes, count))
    }

    unsafe fn create_index2_w(
        &self,
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate1<u16>,
        count: u32,
    ) -> i32 {
        call!(self, JetCreateIndex2W(sesid, tableid, indexes, count))
    }

    fn delete_index_a(&self, sesid: usize, tableid: usize, name: &CStr) -> i32 {
        call!(self, JetDeleteIndexA(sesid, tableid, name.as_ptr()))
    }

    fn delete_index_w(&self, sesid: usize, tableid: usize, name: &[u16]) -> i32 {
        call!(self, JetDeleteIndexW(sesid, tableid, name.as_ptr()))
    }

    unsafe fn create_table_column_index_a(
        &self,
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<c_char>,
    ) -> i32 {
        call!(self, JetCreateTableColumnIndexA(sesid, dbid, create))
    }

    unsafe fn create_table_column_index_w(
        &self,
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<u16>,
    ) -> i32 {
        call!(self, JetCreateTableColumnIndexW(sesid, dbid, create))
    }

    fn get_table_column_info_list_a(&self, sesid: usize, tableid: usize, list: &mut NativeColumnList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetTableColumnInfoA(
            sesid,
            tableid,
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO_LIST,
        ))
    }

    fn get_table_column_info_list_w(&self, sesid: usize, tableid: usize, list: &mut NativeColumnList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetTableColumnInfoW(
            sesid,
            tableid,
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO_LIST,
        ))
    }

    fn get_column_info_list_a(&self, sesid: usize, dbid: u32, table: &CStr, list: &mut NativeColumnList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetColumnInfoA(
            sesid,
            dbid,
            table.as_ptr(),
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO_LIST,
        ))
    }

    fn get_column_info_list_w(&self, sesid: usize, dbid: u32, table: &[u16], list: &mut NativeColumnList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetColumnInfoW(
            sesid,
            dbid,
            table.as_ptr(),
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::COL_INFO_LIST,
        ))
    }

    fn get_table_index_info_list_a(
        &self,
        sesid: usize,
        tableid: usize,
        index: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetTableIndexInfoA(
            sesid,
            tableid,
            opt_a(index),
            list as *mut _ as *mut c_void,
            size,
            info_level::IDX_INFO_LIST,
        ))
    }

    fn get_table_index_info_list_w(
        &self,
        sesid: usize,
        tableid: usize,
        index: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetTableIndexInfoW(
            sesid,
            tableid,
            opt_w(index),
            list as *mut _ as *mut c_void,
            size,
            info_level::IDX_INFO_LIST,
        ))
    }

    fn get_index_info_list_a(
        &self,
        sesid: usize,
        dbid: u32,
        table: &CStr,
        index: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetIndexInfoA(
            sesid,
            dbid,
            table.as_ptr(),
            opt_a(index),
            list as *mut _ as *mut c_void,
            size,
            info_level::IDX_INFO_LIST,
        ))
    }

    fn get_index_info_list_w(
        &self,
        sesid: usize,
        dbid: u32,
        table: &[u16],
        index: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetIndexInfoW(
            sesid,
            dbid,
            table.as_ptr(),
            opt_w(index),
            list as *mut _ as *mut c_void,
            size,
            info_level::IDX_INFO_LIST,
        ))
    }

    fn get_object_info_list_a(&self, sesid: usize, dbid: u32, objtyp: u32, list: &mut NativeObjectList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetObjectInfoA(
            sesid,
            dbid,
            objtyp,
            ptr::null(),
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::OBJ_INFO_LIST_NO_STATS,
        ))
    }

    fn get_object_info_list_w(&self, sesid: usize, dbid: u32, objtyp: u32, list: &mut NativeObjectList) -> i32 {
        let size = size_of_val(list);
        call!(self, JetGetObjectInfoW(
            sesid,
            dbid,
            objtyp,
            ptr::null(),
            ptr::null(),
            list as *mut _ as *mut c_void,
            size,
            info_level::OBJ_INFO_LIST_NO_STATS,
        ))
    }

    fn open_temp_table(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        call!(self, JetOpenTempTable(
            sesid,
            columns.as_ptr(),
            columns.len() as u32,
            grbit,
            tableid,
            columnids.as_mut_ptr(),
        ))
    }

    fn open_temp_table2(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        lcid: u32,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        call!(self, JetOpenTempTable2(
            sesid,
            columns.as_ptr(),
            columns.len() as u32,
            lcid,
            grbit,
            tableid,
            columnids.as_mut_ptr(),
        ))
    }

    unsafe fn open_temp_table3(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        unicode: *const NativeUnicodeIndex,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32 {
        call!(self, JetOpenTempTable3(
        sesid,
        columns.as_ptr(),
        columns.len() as u32,
        unicode,
        grbit,
        tableid,
        columnids.as_mut_ptr(),
    ))
}

fn move_cursor(&self, sesid: usize, tableid: usize, offset: i32, grbit: u32) -> i32 {
    call!(self, JetMove(sesid, tableid, offset, grbit))
}

fn make_key(&self, sesid: usize, tableid: usize, bytes: &[u8], grbit: u32) -> i32 {
    call!(self, JetMakeKey(sesid, tableid, data(bytes), bytes.len() as u32, grbit))
}

fn seek(&self, sesid: usize, tableid: usize, grbit: u32) -> i32 {
    call!(self, JetSeek(sesid, tableid, grbit))
}

fn set_current_index_a(&self, sesid: usize, tableid: usize, index: Option<&CStr>) -> i32 {
    call!(self, JetSetCurrentIndexA(sesid, tableid, opt_a(index)))
}

fn set_current_index_w(&self, sesid: usize, tableid: usize, index: Option<&[u16]>) -> i32 {
    call!(self, JetSetCurrentIndexW(sesid, tableid, opt_w(index)))
}

fn prepare_update(&self, sesid: usize, tableid: usize, prep: u32) -> i32 {
    call!(self, JetPrepareUpdate(sesid, tableid, prep))
}

fn update(&self, sesid: usize, tableid: usize, bookmark: &mut [u8], actual: &mut u32) -> i32 {
    let size = bookmark.len() as u32;
    call!(self, JetUpdate(sesid, tableid, data_mut(bookmark), size, actual))
}

fn delete(&self, sesid: usize, tableid: usize) -> i32 {
    call!(self, JetDelete(sesid, tableid))
}

fn set_column(&self, sesid: usize, tableid: usize, columnid: u32, bytes: &[u8], grbit: u32) -> i32 {
    call!(self, JetSetColumn(
            sesid,
            tableid,
            columnid,
            data(bytes),
            bytes.len() as u32,
            grbit,
            ptr::null_mut(),
        ))
    }

    fn retrieve_column(
        &self,
        sesid: usize,
        tableid: usize,
        columnid: u32,
        bytes: &mut [u8],
        actual: &mut u32,
        grbit: u32,
    ) -> i32 {
        let size = bytes.len() as u32;
        call!(self, JetRetrieveColumn(
            sesid,
            tableid,
            columnid,
            data_mut(bytes),
            size,
            actual,
            grbit,
            ptr::null_mut(),
        ))
    }
}

// --- esent.dll exports, resolved at load time ---

exports! {

    fn JetCreateInstanceA(instance: *mut usize, name: *const c_char) -> i32;
    fn JetCreateInstanceW(instance: *mut usize, name: *const u16) -> i32;
    fn JetInit(instance: *mut usize) -> i32;
    fn JetTerm(instance: usize) -> i32;
    fn JetSetSystemParameterA(
        instance: *mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: *const c_char,
    ) -> i32;
    fn JetSetSystemParameterW(
        instance: *mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: *const u16,
    ) -> i32;

    fn JetBeginSessionA(
        instance: usize,
        sesid: *mut usize,
        user: *const c_char,
        password: *const c_char,
    ) -> i32;
    fn JetBeginSessionW(
        instance: usize,
        sesid: *mut usize,
        user: *const u16,
        password: *const u16,
    ) -> i32;
    fn JetDupSession(sesid: usize, new_sesid: *mut usize) -> i32;
    fn JetEndSession(sesid: usize, grbit: u32) -> i32;
    fn JetGetVersion(sesid: usize, version: *mut u32) -> i32;
    fn JetSetSessionContext(sesid: usize, context: usize) -> i32;
    fn JetResetSessionContext(sesid: usize) -> i32;

    fn JetCreateDatabaseA(
        sesid: usize,
        path: *const c_char,
        connect: *const c_char,
        dbid: *mut u32,
        grbit: u32,
    ) -> i32;
    fn JetCreateDatabaseW(
        sesid: usize,
        path: *const u16,
        connect: *const u16,
        dbid: *mut u32,
        grbit: u32,
    ) -> i32;
    fn JetAttachDatabaseA(sesid: usize, path: *const c_char, grbit: u32) -> i32;
    fn JetAttachDatabaseW(sesid: usize, path: *const u16, grbit: u32) -> i32;
    fn JetDetachDatabaseA(sesid: usize, path: *const c_char) -> i32;
    fn JetDetachDatabaseW(sesid: usize, path: *const u16) -> i32;
    fn JetOpenDatabaseA(
        sesid: usize,
        path: *const c_char,
        connect: *const c_char,
        dbid: *mut u32,
        grbit: u32,
    ) -> i32;
    fn JetOpenDatabaseW(
        sesid: usize,
        path: *const u16,
        connect: *const u16,
        dbid: *mut u32,
        grbit: u32,
    ) -> i32;
    fn JetCloseDatabase(sesid: usize, dbid: u32, grbit: u32) -> i32;

    fn JetBeginTransaction(sesid: usize) -> i32;
    fn JetCommitTransaction(sesid: usize, grbit: u32) -> i32;
    fn JetRollback(sesid: usize, grbit: u32) -> i32;

    fn JetCreateTableA(
        sesid: usize,
        dbid: u32,
        name: *const c_char,
        pages: u32,
        density: u32,
        tableid: *mut usize,
    ) -> i32;
    fn JetCreateTableW(
        sesid: usize,
        dbid: u32,
        name: *const u16,
        pages: u32,
        density: u32,
        tableid: *mut usize,
    ) -> i32;
    fn JetOpenTableA(
        sesid: usize,
        dbid: u32,
        name: *const c_char,
        parameters: *const c_void,
        cb_parameters: u32,
        grbit: u32,
        tableid: *mut usize,
    ) -> i32;
    fn JetOpenTableW(
        sesid: usize,
        dbid: u32,
        name: *const u16,
        parameters: *const c_void,
        cb_parameters: u32,
        grbit: u32,
        tableid: *mut usize,
    ) -> i32;
    fn JetCloseTable(sesid: usize, tableid: usize) -> i32;
    fn JetDeleteTableA(sesid: usize, dbid: u32, name: *const c_char) -> i32;
    fn JetDeleteTableW(sesid: usize, dbid: u32, name: *const u16) -> i32;
    fn JetAddColumnA(
        sesid: usize,
        tableid: usize,
        name: *const c_char,
        def: *const NativeColumnDef,
        default: *const c_void,
        cb_default: u32,
        columnid: *mut u32,
    ) -> i32;
    fn JetAddColumnW(
        sesid: usize,
        tableid: usize,
        name: *const u16,
        def: *const NativeColumnDef,
        default: *const c_void,
        cb_default: u32,
        columnid: *mut u32,
    ) -> i32;
    fn JetDeleteColumnA(sesid: usize, tableid: usize, name: *const c_char) -> i32;
    fn JetDeleteColumnW(sesid: usize, tableid: usize, name: *const u16) -> i32;
    fn JetGetTableColumnInfoA(
        sesid: usize,
        tableid: usize,
        column: *const c_char,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetTableColumnInfoW(
        sesid: usize,
        tableid: usize,
        column: *const u16,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetColumnInfoA(
        sesid: usize,
        dbid: u32,
        table: *const c_char,
        column: *const c_char,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetColumnInfoW(
        sesid: usize,
        dbid: u32,
        table: *const u16,
        column: *const u16,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetCreateIndex2A(
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate<c_char>,
        count: u32,
    ) -> i32;
    fn JetCreateIndex2W(
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate1<u16>,
        count: u32,
    ) -> i32;
    fn JetDeleteIndexA(sesid: usize, tableid: usize, name: *const c_char) -> i32;
    fn JetDeleteIndexW(sesid: usize, tableid: usize, name: *const u16) -> i32;
    fn JetCreateTableColumnIndexA(
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<c_char>,
    ) -> i32;
    fn JetCreateTableColumnIndexW(
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<u16>,
    ) -> i32;

    fn JetGetTableIndexInfoA(
        sesid: usize,
        tableid: usize,
        index: *const c_char,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetTableIndexInfoW(
        sesid: usize,
        tableid: usize,
        index: *const u16,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetIndexInfoA(
        sesid: usize,
        dbid: u32,
        table: *const c_char,
        index: *const c_char,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetIndexInfoW(
        sesid: usize,
        dbid: u32,
        table: *const u16,
        index: *const u16,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetObjectInfoA(
        sesid: usize,
        dbid: u32,
        objtyp: u32,
        container: *const c_char,
        object: *const c_char,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;
    fn JetGetObjectInfoW(
        sesid: usize,
        dbid: u32,
        objtyp: u32,
        container: *const u16,
        object: *const u16,
        result: *mut c_void,
        cb_result: u32,
        info_level: u32,
    ) -> i32;

    fn JetOpenTempTable(
        sesid: usize,
        columns: *const NativeColumnDef,
        count: u32,
        grbit: u32,
        tableid: *mut usize,
        columnids: *mut u32,
    ) -> i32;
    fn JetOpenTempTable2(
        sesid: usize,
        columns: *const NativeColumnDef,
        count: u32,
        lcid: u32,
        grbit: u32,
        tableid: *mut usize,
        columnids: *mut u32,
    ) -> i32;
    fn JetOpenTempTable3(
        sesid: usize,
        columns: *const NativeColumnDef,
        count: u32,
        unicode: *const NativeUnicodeIndex,
        grbit: u32,
        tableid: *mut usize,
        columnids: *mut u32,
    ) -> i32;

    fn JetMove(sesid: usize, tableid: usize, rows: i32, grbit: u32) -> i32;
    fn JetMakeKey(sesid: usize, tableid: usize, data: *const c_void, cb_data: u32, grbit: u32) -> i32;
    fn JetSeek(sesid: usize, tableid: usize, grbit: u32) -> i32;
    fn JetSetCurrentIndexA(sesid: usize, tableid: usize, index: *const c_char) -> i32;
    fn JetSetCurrentIndexW(sesid: usize, tableid: usize, index: *const u16) -> i32;
    fn JetPrepareUpdate(sesid: usize, tableid: usize, prep: u32) -> i32;
    fn JetUpdate(
        sesid: usize,
        tableid: usize,
        bookmark: *mut c_void,
        cb_bookmark: u32,
        actual: *mut u32,
    ) -> i32;
    fn JetDelete(sesid: usize, tableid: usize) -> i32;
    fn JetSetColumn(
        sesid: usize,
        tableid: usize,
        columnid: u32,
        data: *const c_void,
        cb_data: u32,
        grbit: u32,
        set_info: *mut c_void,
    ) -> i32;
    fn JetRetrieveColumn(
        sesid: usize,
        tableid: usize,
        columnid: u32,
        data: *mut c_void,
        cb_data: u32,
        actual: *mut u32,
        grbit: u32,
        ret_info: *mut c_void,
    ) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_exports() -> Esent {
        let name = CStr::from_bytes_with_nul(b"kernel32.dll\0").unwrap();
        Esent {
            exports: Exports::default(),
            _lib: DynLib::open(name).unwrap(),
        }
    }

    #[test]
    fn missing_export_reports_feature_not_available() {
        let esent = without_exports();
        let mut instance = 0usize;
        let name = CStr::from_bytes_with_nul(b"x\0").unwrap();

        assert_eq!(esent.create_instance_a(&mut instance, name), codes::FEATURE_NOT_AVAILABLE);
        assert_eq!(esent.begin_transaction(1), codes::FEATURE_NOT_AVAILABLE);
        assert_eq!(instance, 0);
    }

    #[test]
    fn every_export_is_listed_when_missing() {
        let missing = Exports::default().missing();
        assert!(missing.contains(&"JetCreateIndex2W"));
        assert!(missing.contains(&"JetOpenTempTable3"));
        assert!(missing.contains(&"JetGetVersion"));
    }

    #[test]
    fn unknown_symbols_do_not_resolve() {
        let lib = DynLib::open(CStr::from_bytes_with_nul(b"kernel32.dll\0").unwrap()).unwrap();
        assert!(lookup(&lib, "JetNoSuchExport\0").is_none());
    }

    #[test]
    fn system_engine_loads() {
        let esent = Esent::load().unwrap();
        assert!(esent.exports.JetGetVersion.is_some());
        assert!(esent.exports.JetCreateInstanceA.is_some());
    }
}
