//! Instruction model: opcodes, operands, jump-target labels, and the
//! target-method identity used for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique jump-target marker minted by the caller's method-body decoder.
///
/// The editor never creates labels; it only copies, moves, or clears them.
/// At any point in time a label marks exactly one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Enumerated operation identifier covering the target runtime's
/// stack-machine instruction set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Nop,
    LoadConst,
    LoadLocal,
    StoreLocal,
    LoadArg,
    StoreArg,
    LoadField,
    StoreField,
    LoadStatic,
    StoreStatic,
    LoadElem,
    StoreElem,
    Call,
    CallVirt,
    NewObj,
    Ret,
    Jump,
    JumpIf,
    JumpIfNot,
    Switch,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    CmpEq,
    CmpGt,
    CmpLt,
    ConvInt,
    ConvFloat,
    Dup,
    Pop,
    Throw,
}

impl Opcode {
    /// Returns the canonical mnemonic used in listings and dumps.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::LoadLocal => "LOAD_LOCAL",
            Opcode::StoreLocal => "STORE_LOCAL",
            Opcode::LoadArg => "LOAD_ARG",
            Opcode::StoreArg => "STORE_ARG",
            Opcode::LoadField => "LOAD_FIELD",
            Opcode::StoreField => "STORE_FIELD",
            Opcode::LoadStatic => "LOAD_STATIC",
            Opcode::StoreStatic => "STORE_STATIC",
            Opcode::LoadElem => "LOAD_ELEM",
            Opcode::StoreElem => "STORE_ELEM",
            Opcode::Call => "CALL",
            Opcode::CallVirt => "CALL_VIRT",
            Opcode::NewObj => "NEW_OBJ",
            Opcode::Ret => "RET",
            Opcode::Jump => "JUMP",
            Opcode::JumpIf => "JUMP_IF",
            Opcode::JumpIfNot => "JUMP_IF_NOT",
            Opcode::Switch => "SWITCH",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Rem => "REM",
            Opcode::Neg => "NEG",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
            Opcode::CmpEq => "CMP_EQ",
            Opcode::CmpGt => "CMP_GT",
            Opcode::CmpLt => "CMP_LT",
            Opcode::ConvInt => "CONV_INT",
            Opcode::ConvFloat => "CONV_FLOAT",
            Opcode::Dup => "DUP",
            Opcode::Pop => "POP",
            Opcode::Throw => "THROW",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// Reference to a method or field on some type, opaque to the editor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
}

impl MemberRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// Operand value attached to an instruction; the meaningful variants
/// depend on the opcode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Integer constant.
    Int(i64),
    /// Floating-point constant.
    Float(f64),
    /// String constant.
    Str(String),
    /// Reference to another instruction's position via its label.
    Target(Label),
    /// Local-variable slot identifier.
    Slot(u16),
    /// Method or field reference.
    Member(MemberRef),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(v) => write!(f, "{v}"),
            Operand::Float(v) => write!(f, "{v}"),
            Operand::Str(v) => write!(f, "{v:?}"),
            Operand::Target(label) => write!(f, "{label}"),
            Operand::Slot(slot) => write!(f, "slot#{slot}"),
            Operand::Member(member) => write!(f, "{member}"),
        }
    }
}

/// Single decoded instruction: opcode, optional operand, and the set of
/// labels marking it as a jump target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Opcode,
    pub operand: Option<Operand>,
    pub labels: Vec<Label>,
}

impl Instruction {
    /// Operand-less instruction with no labels.
    pub fn new(op: Opcode) -> Self {
        Self {
            op,
            operand: None,
            labels: Vec::new(),
        }
    }

    /// Instruction carrying an operand, with no labels.
    pub fn with_operand(op: Opcode, operand: Operand) -> Self {
        Self {
            op,
            operand: Some(operand),
            labels: Vec::new(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}")?;
        }
        if !self.labels.is_empty() {
            write!(f, ": ")?;
        }
        match &self.operand {
            Some(operand) => write!(f, "{:<12} {}", self.op, operand),
            None => write!(f, "{}", self.op),
        }
    }
}

/// Identity of the method whose body is being rewritten. Opaque to the
/// editor; only used to name diagnostics and to key the patch ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetMethod {
    pub owner: String,
    pub name: String,
}

impl TargetMethod {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}
