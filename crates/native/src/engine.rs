//! The engine's flat function surface
//!
//! One method per native entry point. Arguments are primitive values, raw
//! handle values and native records; every method returns the raw signed
//! status. Path- and name-taking entry points come in pairs: `_a` takes
//! `&CStr`, `_w` takes NUL-terminated UTF-16. Callers pick the variant from
//! the engine's capabilities, never per call.
//!
//! Entry points whose records embed pointers are `unsafe`: the caller must
//! keep everything those pointers reach alive for the duration of the call.

use crate::records::{
    NativeColumnCreate, NativeColumnDef, NativeColumnList, NativeIndexCreate, NativeIndexCreate1,
    NativeIndexList, NativeObjectList, NativeTableCreate, NativeUnicodeIndex,
};
use std::ffi::{c_char, CStr};

/// The flat native API.
///
/// Handle arguments are the raw values (`usize` for instance, session and
/// table; `u32` for database and column). Wide strings (`&[u16]`) always
/// include their terminating NUL.
pub trait NativeEngine: Send + Sync {
    // ---- instance -------------------------------------------------------

    /// `JetCreateInstanceA`
    fn create_instance_a(&self, instance: &mut usize, name: &CStr) -> i32;
    /// `JetCreateInstanceW`
    fn create_instance_w(&self, instance: &mut usize, name: &[u16]) -> i32;
    /// `JetInit`
    fn init(&self, instance: &mut usize) -> i32;
    /// `JetTerm`
    fn term(&self, instance: usize) -> i32;
    /// `JetSetSystemParameterA`
    fn set_system_parameter_a(
        &self,
        instance: &mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&CStr>,
    ) -> i32;
    /// `JetSetSystemParameterW`
    fn set_system_parameter_w(
        &self,
        instance: &mut usize,
        sesid: usize,
        paramid: u32,
        value: usize,
        text: Option<&[u16]>,
    ) -> i32;

    // ---- session --------------------------------------------------------

    /// `JetBeginSessionA`
    fn begin_session_a(
        &self,
        instance: usize,
        sesid: &mut usize,
        user: &CStr,
        password: &CStr,
    ) -> i32;
    /// `JetBeginSessionW`
    fn begin_session_w(
        &self,
        instance: usize,
        sesid: &mut usize,
        user: &[u16],
        password: &[u16],
    ) -> i32;
    /// `JetDupSession`
    fn dup_session(&self, sesid: usize, new_sesid: &mut usize) -> i32;
    /// `JetEndSession`
    fn end_session(&self, sesid: usize, grbit: u32) -> i32;
    /// `JetGetVersion`
    fn get_version(&self, sesid: usize, version: &mut u32) -> i32;
    /// `JetSetSessionContext`
    fn set_session_context(&self, sesid: usize, context: usize) -> i32;
    /// `JetResetSessionContext`
    fn reset_session_context(&self, sesid: usize) -> i32;

    // ---- database -------------------------------------------------------

    /// `JetCreateDatabaseA`
    fn create_database_a(&self, sesid: usize, path: &CStr, dbid: &mut u32, grbit: u32) -> i32;
    /// `JetCreateDatabaseW`
    fn create_database_w(&self, sesid: usize, path: &[u16], dbid: &mut u32, grbit: u32) -> i32;
    /// `JetAttachDatabaseA`
    fn attach_database_a(&self, sesid: usize, path: &CStr, grbit: u32) -> i32;
    /// `JetAttachDatabaseW`
    fn attach_database_w(&self, sesid: usize, path: &[u16], grbit: u32) -> i32;
    /// `JetDetachDatabaseA`; `None` detaches everything
    fn detach_database_a(&self, sesid: usize, path: Option<&CStr>) -> i32;
    /// `JetDetachDatabaseW`; `None` detaches everything
    fn detach_database_w(&self, sesid: usize, path: Option<&[u16]>) -> i32;
    /// `JetOpenDatabaseA`
    fn open_database_a(&self, sesid: usize, path: &CStr, dbid: &mut u32, grbit: u32) -> i32;
    /// `JetOpenDatabaseW`
    fn open_database_w(&self, sesid: usize, path: &[u16], dbid: &mut u32, grbit: u32) -> i32;
    /// `JetCloseDatabase`
    fn close_database(&self, sesid: usize, dbid: u32, grbit: u32) -> i32;

    // ---- transactions ---------------------------------------------------

    /// `JetBeginTransaction`
    fn begin_transaction(&self, sesid: usize) -> i32;
    /// `JetCommitTransaction`
    fn commit_transaction(&self, sesid: usize, grbit: u32) -> i32;
    /// `JetRollback`
    fn rollback(&self, sesid: usize, grbit: u32) -> i32;

    // ---- DDL ------------------------------------------------------------

    /// `JetCreateTableA`
    fn create_table_a(
        &self,
        sesid: usize,
        dbid: u32,
        name: &CStr,
        pages: u32,
        density: u32,
        tableid: &mut usize,
    ) -> i32;
    /// `JetCreateTableW`
    fn create_table_w(
        &self,
        sesid: usize,
        dbid: u32,
        name: &[u16],
        pages: u32,
        density: u32,
        tableid: &mut usize,
    ) -> i32;
    /// `JetOpenTableA`
    fn open_table_a(
        &self,
        sesid: usize,
        dbid: u32,
        name: &CStr,
        grbit: u32,
        tableid: &mut usize,
    ) -> i32;
    /// `JetOpenTableW`
    fn open_table_w(
        &self,
        sesid: usize,
        dbid: u32,
        name: &[u16],
        grbit: u32,
        tableid: &mut usize,
    ) -> i32;
    /// `JetCloseTable`
    fn close_table(&self, sesid: usize, tableid: usize) -> i32;
    /// `JetDeleteTableA`
    fn delete_table_a(&self, sesid: usize, dbid: u32, name: &CStr) -> i32;
    /// `JetDeleteTableW`
    fn delete_table_w(&self, sesid: usize, dbid: u32, name: &[u16]) -> i32;
    /// `JetAddColumnA`
    fn add_column_a(
        &self,
        sesid: usize,
        tableid: usize,
        name: &CStr,
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32;
    /// `JetAddColumnW`
    fn add_column_w(
        &self,
        sesid: usize,
        tableid: usize,
        name: &[u16],
        def: &NativeColumnDef,
        default: &[u8],
        columnid: &mut u32,
    ) -> i32;
    /// `JetDeleteColumnA`
    fn delete_column_a(&self, sesid: usize, tableid: usize, name: &CStr) -> i32;
    /// `JetDeleteColumnW`
    fn delete_column_w(&self, sesid: usize, tableid: usize, name: &[u16]) -> i32;
    /// `JetGetTableColumnInfoA` at `JET_ColInfo`
    fn get_table_column_info_a(
        &self,
        sesid: usize,
        tableid: usize,
        column: &CStr,
        def: &mut NativeColumnDef,
    ) -> i32;
    /// `JetGetTableColumnInfoW` at `JET_ColInfo`
    fn get_table_column_info_w(
        &self,
        sesid: usize,
        tableid: usize,
        column: &[u16],
        def: &mut NativeColumnDef,
    ) -> i32;

    /// `JetCreateIndex2A` with legacy-layout records.
    ///
    /// # Safety
    ///
    /// `indexes` must point to `count` records whose string and descriptor
    /// pointers stay valid for the call.
    unsafe fn create_index2_a(
        &self,
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate<c_char>,
        count: u32,
    ) -> i32;

    /// `JetCreateIndex2W` with Vista-layout records.
    ///
    /// # Safety
    ///
    /// `indexes` must point to `count` records whose string and descriptor
    /// pointers stay valid for the call.
    unsafe fn create_index2_w(
        &self,
        sesid: usize,
        tableid: usize,
        indexes: *mut NativeIndexCreate1<u16>,
        count: u32,
    ) -> i32;

    /// `JetDeleteIndexA`
    fn delete_index_a(&self, sesid: usize, tableid: usize, name: &CStr) -> i32;
    /// `JetDeleteIndexW`
    fn delete_index_w(&self, sesid: usize, tableid: usize, name: &[u16]) -> i32;

    /// `JetCreateTableColumnIndexA`; `index_creates` holds legacy-layout records.
    ///
    /// # Safety
    ///
    /// Every pointer reachable from `create` must stay valid for the call.
    unsafe fn create_table_column_index_a(
        &self,
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<c_char>,
    ) -> i32;

    /// `JetCreateTableColumnIndexW`; `index_creates` holds Vista-layout records.
    ///
    /// # Safety
    ///
    /// Every pointer reachable from `create` must stay valid for the call.
    unsafe fn create_table_column_index_w(
        &self,
        sesid: usize,
        dbid: u32,
        create: *mut NativeTableCreate<u16>,
    ) -> i32;

    // ---- introspection --------------------------------------------------

    /// `JetGetTableColumnInfoA` at `JET_ColInfoList`
    fn get_table_column_info_list_a(
        &self,
        sesid: usize,
        tableid: usize,
        list: &mut NativeColumnList,
    ) -> i32;
    /// `JetGetTableColumnInfoW` at `JET_ColInfoList`
    fn get_table_column_info_list_w(
        &self,
        sesid: usize,
        tableid: usize,
        list: &mut NativeColumnList,
    ) -> i32;
    /// `JetGetColumnInfoA` at `JET_ColInfoList`
    fn get_column_info_list_a(
        &self,
        sesid: usize,
        dbid: u32,
        table: &CStr,
        list: &mut NativeColumnList,
    ) -> i32;
    /// `JetGetColumnInfoW` at `JET_ColInfoList`
    fn get_column_info_list_w(
        &self,
        sesid: usize,
        dbid: u32,
        table: &[u16],
        list: &mut NativeColumnList,
    ) -> i32;
    /// `JetGetTableIndexInfoA` at `JET_IdxInfoList`
    fn get_table_index_info_list_a(
        &self,
        sesid: usize,
        tableid: usize,
        index: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32;
    /// `JetGetTableIndexInfoW` at `JET_IdxInfoList`
    fn get_table_index_info_list_w(
        &self,
        sesid: usize,
        tableid: usize,
        index: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32;
    /// `JetGetIndexInfoA` at `JET_IdxInfoList`
    fn get_index_info_list_a(
        &self,
        sesid: usize,
        dbid: u32,
        table: &CStr,
        index: Option<&CStr>,
        list: &mut NativeIndexList,
    ) -> i32;
    /// `JetGetIndexInfoW` at `JET_IdxInfoList`
    fn get_index_info_list_w(
        &self,
        sesid: usize,
        dbid: u32,
        table: &[u16],
        index: Option<&[u16]>,
        list: &mut NativeIndexList,
    ) -> i32;
    /// `JetGetObjectInfoA` at `JET_ObjInfoListNoStats`
    fn get_object_info_list_a(
        &self,
        sesid: usize,
        dbid: u32,
        objtyp: u32,
        list: &mut NativeObjectList,
    ) -> i32;
    /// `JetGetObjectInfoW` at `JET_ObjInfoListNoStats`
    fn get_object_info_list_w(
        &self,
        sesid: usize,
        dbid: u32,
        objtyp: u32,
        list: &mut NativeObjectList,
    ) -> i32;

    // ---- temporary tables -----------------------------------------------

    /// `JetOpenTempTable`; `columnids` has one slot per column definition
    fn open_temp_table(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32;

    /// `JetOpenTempTable2`: sort with a numeric locale
    fn open_temp_table2(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        lcid: u32,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32;

    /// `JetOpenTempTable3`: sort with a full normalization descriptor.
    ///
    /// # Safety
    ///
    /// `unicode` must point to a descriptor that stays valid for the call.
    unsafe fn open_temp_table3(
        &self,
        sesid: usize,
        columns: &[NativeColumnDef],
        unicode: *const NativeUnicodeIndex,
        grbit: u32,
        tableid: &mut usize,
        columnids: &mut [u32],
    ) -> i32;

    // ---- records --------------------------------------------------------

    /// `JetMove`
    fn move_cursor(&self, sesid: usize, tableid: usize, offset: i32, grbit: u32) -> i32;
    /// `JetMakeKey`; empty data is passed as null
    fn make_key(&self, sesid: usize, tableid: usize, data: &[u8], grbit: u32) -> i32;
    /// `JetSeek`
    fn seek(&self, sesid: usize, tableid: usize, grbit: u32) -> i32;
    /// `JetSetCurrentIndexA`; `None` selects the primary index
    fn set_current_index_a(&self, sesid: usize, tableid: usize, index: Option<&CStr>) -> i32;
    /// `JetSetCurrentIndexW`; `None` selects the primary index
    fn set_current_index_w(&self, sesid: usize, tableid: usize, index: Option<&[u16]>) -> i32;
    /// `JetPrepareUpdate`
    fn prepare_update(&self, sesid: usize, tableid: usize, prep: u32) -> i32;
    /// `JetUpdate`; an empty bookmark buffer is passed as null
    fn update(&self, sesid: usize, tableid: usize, bookmark: &mut [u8], actual: &mut u32) -> i32;
    /// `JetDelete`
    fn delete(&self, sesid: usize, tableid: usize) -> i32;
    /// `JetSetColumn`; empty data is passed as null
    fn set_column(
        &self,
        sesid: usize,
        tableid: usize,
        columnid: u32,
        data: &[u8],
        grbit: u32,
    ) -> i32;
    /// `JetRetrieveColumn`; an empty buffer is passed as null
    fn retrieve_column(
        &self,
        sesid: usize,
        tableid: usize,
        columnid: u32,
        data: &mut [u8],
        actual: &mut u32,
        grbit: u32,
    ) -> i32;
}
