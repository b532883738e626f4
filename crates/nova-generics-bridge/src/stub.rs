/// Class-file level view of one class: names, flags, and the raw descriptor / `Signature`
/// strings of its members.
///
/// `binary_name` and `super_binary_name` may use either `.` or `/` as the package separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStub {
    pub binary_name: String,
    pub access_flags: u16,
    pub super_binary_name: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStub {
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub access_flags: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodStub {
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub access_flags: u16,
}
