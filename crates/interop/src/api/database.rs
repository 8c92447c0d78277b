//! Databases and transactions

use super::{Api, NativeText};
use isam_core::{
    AttachDatabaseFlags, CommitFlags, CreateDatabaseFlags, DbId, OpenDatabaseFlags, Result,
    RollbackFlags, Session, Status,
};

impl Api {
    /// Create a database file and attach it to the session's instance.
    pub fn create_database(
        &self,
        sesid: Session,
        path: &str,
        dbid: &mut DbId,
        grbit: CreateDatabaseFlags,
    ) -> Result<Status> {
        let path = self.name(path, "path")?;
        let mut raw = DbId::NIL.raw();
        let code = match &path {
            NativeText::Ansi(p) => {
                self.engine()
                    .create_database_a(sesid.raw(), p, &mut raw, grbit.bits())
            }
            NativeText::Wide(p) => {
                self.engine()
                    .create_database_w(sesid.raw(), p, &mut raw, grbit.bits())
            }
        };
        *dbid = DbId::from_raw(raw);
        self.finish("JetCreateDatabase", code)
    }

    /// Attach an existing database file.
    pub fn attach_database(
        &self,
        sesid: Session,
        path: &str,
        grbit: AttachDatabaseFlags,
    ) -> Result<Status> {
        let path = self.name(path, "path")?;
        let code = match &path {
            NativeText::Ansi(p) => self.engine().attach_database_a(sesid.raw(), p, grbit.bits()),
            NativeText::Wide(p) => self.engine().attach_database_w(sesid.raw(), p, grbit.bits()),
        };
        self.finish("JetAttachDatabase", code)
    }

    /// Detach one database, or every database when `path` is `None`.
    pub fn detach_database(&self, sesid: Session, path: Option<&str>) -> Result<Status> {
        let code = match self.optional_text(path, "path")? {
            None if self.wide() => self.engine().detach_database_w(sesid.raw(), None),
            None => self.engine().detach_database_a(sesid.raw(), None),
            Some(NativeText::Ansi(p)) => {
                self.engine()
                    .detach_database_a(sesid.raw(), Some(p.as_c_str()))
            }
            Some(NativeText::Wide(p)) => {
                self.engine()
                    .detach_database_w(sesid.raw(), Some(p.as_slice()))
            }
        };
        self.finish("JetDetachDatabase", code)
    }

    /// Open an attached database for this session.
    pub fn open_database(
        &self,
        sesid: Session,
        path: &str,
        dbid: &mut DbId,
        grbit: OpenDatabaseFlags,
    ) -> Result<Status> {
        let path = self.name(path, "path")?;
        let mut raw = DbId::NIL.raw();
        let code = match &path {
            NativeText::Ansi(p) => {
                self.engine()
                    .open_database_a(sesid.raw(), p, &mut raw, grbit.bits())
            }
            NativeText::Wide(p) => {
                self.engine()
                    .open_database_w(sesid.raw(), p, &mut raw, grbit.bits())
            }
        };
        *dbid = DbId::from_raw(raw);
        self.finish("JetOpenDatabase", code)
    }

    /// Close a database opened with [`Api::open_database`].
    pub fn close_database(&self, sesid: Session, dbid: DbId) -> Result<Status> {
        self.finish(
            "JetCloseDatabase",
            self.engine().close_database(sesid.raw(), dbid.raw(), 0),
        )
    }

    /// Start a (possibly nested) transaction.
    pub fn begin_transaction(&self, sesid: Session) -> Result<Status> {
        self.finish(
            "JetBeginTransaction",
            self.engine().begin_transaction(sesid.raw()),
        )
    }

    /// Commit the innermost transaction.
    pub fn commit_transaction(&self, sesid: Session, grbit: CommitFlags) -> Result<Status> {
        self.finish(
            "JetCommitTransaction",
            self.engine().commit_transaction(sesid.raw(), grbit.bits()),
        )
    }

    /// Undo the innermost transaction, or all of them with `ROLLBACK_ALL`.
    pub fn rollback(&self, sesid: Session, grbit: RollbackFlags) -> Result<Status> {
        self.finish("JetRollback", self.engine().rollback(sesid.raw(), grbit.bits()))
    }
}
