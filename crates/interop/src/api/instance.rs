//! Instance and session lifecycle

use super::{Api, NativeText};
use isam_core::{Instance, Result, Session, Status};
use isam_native::chars;

/// Value of a system parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue<'a> {
    /// Numeric parameter
    Number(usize),
    /// String parameter
    Text(&'a str),
}

impl Api {
    /// Create an engine instance.
    pub fn create_instance(&self, instance: &mut Instance, name: &str) -> Result<Status> {
        let name = self.name(name, "name")?;
        let mut raw = 0;
        let code = match &name {
            NativeText::Ansi(name) => self.engine().create_instance_a(&mut raw, name),
            NativeText::Wide(name) => self.engine().create_instance_w(&mut raw, name),
        };
        *instance = Instance::from_raw(raw);
        self.finish("JetCreateInstance", code)
    }

    /// Initialize an instance.
    pub fn init(&self, instance: &mut Instance) -> Result<Status> {
        let mut raw = instance.raw();
        let code = self.engine().init(&mut raw);
        *instance = Instance::from_raw(raw);
        self.finish("JetInit", code)
    }

    /// Shut an instance down.
    pub fn term(&self, instance: Instance) -> Result<Status> {
        self.finish("JetTerm", self.engine().term(instance.raw()))
    }

    /// Set a system parameter, globally or for one instance.
    pub fn set_system_parameter(
        &self,
        instance: &mut Instance,
        sesid: Session,
        paramid: u32,
        value: ParamValue<'_>,
    ) -> Result<Status> {
        let (number, text) = match value {
            ParamValue::Number(n) => (n, None),
            ParamValue::Text(t) => (0, Some(t)),
        };
        let mut raw = instance.raw();
        let code = if self.wide() {
            let text = text.map(|t| chars::wide(t, "value")).transpose()?;
            self.engine().set_system_parameter_w(
                &mut raw,
                sesid.raw(),
                paramid,
                number,
                text.as_deref(),
            )
        } else {
            let text = text.map(|t| chars::ansi(t, "value")).transpose()?;
            self.engine().set_system_parameter_a(
                &mut raw,
                sesid.raw(),
                paramid,
                number,
                text.as_deref(),
            )
        };
        *instance = Instance::from_raw(raw);
        self.finish("JetSetSystemParameter", code)
    }

    /// Begin a session on an initialized instance.
    pub fn begin_session(
        &self,
        instance: Instance,
        sesid: &mut Session,
        user: &str,
        password: &str,
    ) -> Result<Status> {
        let mut raw = 0;
        let code = if self.wide() {
            let user = chars::wide(user, "user")?;
            let password = chars::wide(password, "password")?;
            self.engine()
                .begin_session_w(instance.raw(), &mut raw, &user, &password)
        } else {
            let user = chars::ansi(user, "user")?;
            let password = chars::ansi(password, "password")?;
            self.engine()
                .begin_session_a(instance.raw(), &mut raw, &user, &password)
        };
        *sesid = Session::from_raw(raw);
        self.finish("JetBeginSession", code)
    }

    /// Open a second session sharing the first one's instance.
    pub fn dup_session(&self, sesid: Session, new_sesid: &mut Session) -> Result<Status> {
        let mut raw = 0;
        let code = self.engine().dup_session(sesid.raw(), &mut raw);
        *new_sesid = Session::from_raw(raw);
        self.finish("JetDupSession", code)
    }

    /// End a session.
    pub fn end_session(&self, sesid: Session) -> Result<Status> {
        self.finish("JetEndSession", self.engine().end_session(sesid.raw(), 0))
    }

    /// Raw engine version.
    pub fn get_version(&self, sesid: Session, version: &mut u32) -> Result<Status> {
        self.finish("JetGetVersion", self.engine().get_version(sesid.raw(), version))
    }

    /// Bind a session to a caller-chosen context so another thread can use it.
    pub fn set_session_context(&self, sesid: Session, context: usize) -> Result<Status> {
        self.finish(
            "JetSetSessionContext",
            self.engine().set_session_context(sesid.raw(), context),
        )
    }

    /// Release the binding made by [`Api::set_session_context`].
    pub fn reset_session_context(&self, sesid: Session) -> Result<Status> {
        self.finish(
            "JetResetSessionContext",
            self.engine().reset_session_context(sesid.raw()),
        )
    }
}
