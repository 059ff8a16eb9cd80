//! Structures written by the Cryptoki library and read back afterwards.
//!
//! Key and MAC derivations (SSL 3, TLS 1.2, WTLS) return handles and IVs in a
//! `CK_*_KEY_MAT_OUT` structure that the caller allocates beforehand. The
//! structure belongs to the parameter object until the caller asks for the
//! returned key material: its content is then copied into managed memory and
//! its ownership moves to the caller.

use std::{
    cell::{Cell, OnceCell, RefCell},
    marker::PhantomData,
    rc::Rc,
};

use cosmian_pkcs11_sys::{
    CK_SSL3_KEY_MAT_OUT, CK_WTLS_KEY_MAT_OUT, CStruct, CkLayout, NativePtr, NativeUlong,
    consts::CK_OBJECT_HANDLE,
};
use tracing::{debug, trace};

use crate::{
    PResult, Pkcs11Error, arena::UnmanagedBlock, error::result::PResultHelper, params::Release,
};

/// An output structure whose content can be copied out once the native call returned
pub trait KeyMaterialOutput {
    const NAME: &'static str;

    /// Copy the unmanaged content into managed memory. Later calls reuse the copy.
    fn read_back(&self) -> PResult<()>;

    /// Release the unmanaged memory. Only the first call does anything.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// Who is responsible for releasing an output structure
#[derive(Debug)]
pub(crate) enum ReturnedMaterial<T: KeyMaterialOutput> {
    /// Still owned by the parameter object
    Retained(T),
    /// Read back and handed over to the caller; the parameter object keeps a
    /// reference only to return the same material on later calls
    Transferred(Rc<T>),
    Released,
}

impl<T: KeyMaterialOutput> ReturnedMaterial<T> {
    pub(crate) fn retained(material: T) -> Self {
        Self::Retained(material)
    }

    /// Read the material back (first call only) and share it with the caller
    pub(crate) fn transfer(&mut self) -> PResult<Rc<T>> {
        match std::mem::replace(self, Self::Released) {
            Self::Retained(material) => {
                if let Err(e) = material.read_back() {
                    *self = Self::Retained(material);
                    return Err(e);
                }
                let material = Rc::new(material);
                *self = Self::Transferred(Rc::clone(&material));
                debug!("{} transferred to the caller", T::NAME);
                Ok(material)
            }
            Self::Transferred(material) => {
                *self = Self::Transferred(Rc::clone(&material));
                Ok(material)
            }
            Self::Released => Err(Pkcs11Error::Disposed(T::NAME)),
        }
    }
}

impl<T: KeyMaterialOutput> Release for ReturnedMaterial<T> {
    fn release(&mut self) {
        match std::mem::replace(self, Self::Released) {
            Self::Retained(material) => material.dispose(),
            // the caller owns it now
            Self::Transferred(_) | Self::Released => {}
        }
    }

    /// `pReturnedKeyMaterial` dangles once the caller disposed the material
    fn ensure_usable(&self) -> PResult<()> {
        match self {
            Self::Transferred(material) if material.is_disposed() => {
                Err(Pkcs11Error::Disposed(T::NAME))
            }
            _ => Ok(()),
        }
    }
}

/// Handles and IVs returned by an SSL 3 or TLS 1.2 key and MAC derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ssl3KeyMaterial {
    pub client_mac_secret: CK_OBJECT_HANDLE,
    pub server_mac_secret: CK_OBJECT_HANDLE,
    pub client_key: CK_OBJECT_HANDLE,
    pub server_key: CK_OBJECT_HANDLE,
    pub iv_client: Vec<u8>,
    pub iv_server: Vec<u8>,
}

#[derive(Debug)]
struct Ssl3KeyMatOutBlocks {
    structure: UnmanagedBlock,
    iv_client: UnmanagedBlock,
    iv_server: UnmanagedBlock,
}

/// `CK_SSL3_KEY_MAT_OUT` backed by unmanaged memory
#[derive(Debug)]
pub struct Ssl3KeyMatOut<L: CkLayout> {
    blocks: RefCell<Ssl3KeyMatOutBlocks>,
    iv_len: usize,
    material: OnceCell<Ssl3KeyMaterial>,
    disposed: Cell<bool>,
    _layout: PhantomData<L>,
}

impl<L: CkLayout> Ssl3KeyMatOut<L> {
    /// Allocate the structure and two IV buffers of `iv_len` bytes each
    pub(crate) fn allocate(iv_len: usize) -> PResult<Self> {
        let iv_client = UnmanagedBlock::allocate(iv_len)?;
        let iv_server = UnmanagedBlock::allocate(iv_len)?;
        let mut structure = UnmanagedBlock::allocate(size_of::<CK_SSL3_KEY_MAT_OUT<L>>())?;
        structure.write_struct(&CK_SSL3_KEY_MAT_OUT::<L> {
            pIVClient: iv_client.ptr(),
            pIVServer: iv_server.ptr(),
            ..CK_SSL3_KEY_MAT_OUT::zeroed()
        })?;
        Ok(Self {
            blocks: RefCell::new(Ssl3KeyMatOutBlocks {
                structure,
                iv_client,
                iv_server,
            }),
            iv_len,
            material: OnceCell::new(),
            disposed: Cell::new(false),
            _layout: PhantomData,
        })
    }

    /// Address written in `pReturnedKeyMaterial`
    pub(crate) fn structure_ptr(&self) -> L::Ptr {
        self.blocks.borrow().structure.ptr()
    }

    fn ensure_active(&self) -> PResult<()> {
        if self.disposed.get() {
            return Err(Pkcs11Error::Disposed(Self::NAME));
        }
        Ok(())
    }

    /// The material returned by the token, read from unmanaged memory on first access
    pub fn material(&self) -> PResult<&Ssl3KeyMaterial> {
        self.ensure_active()?;
        if let Some(material) = self.material.get() {
            return Ok(material);
        }
        let blocks = self.blocks.borrow();
        let out = blocks
            .structure
            .read_struct::<CK_SSL3_KEY_MAT_OUT<L>>()?
            .context("the returned key material structure is not allocated")?;
        let material = Ssl3KeyMaterial {
            client_mac_secret: out.hClientMacSecret.to_u64(),
            server_mac_secret: out.hServerMacSecret.to_u64(),
            client_key: out.hClientKey.to_u64(),
            server_key: out.hServerKey.to_u64(),
            iv_client: blocks.iv_client.read(self.iv_len)?.unwrap_or_default(),
            iv_server: blocks.iv_server.read(self.iv_len)?.unwrap_or_default(),
        };
        trace!(
            "read back SSL3 key material: client key {}, server key {}",
            material.client_key, material.server_key
        );
        Ok(self.material.get_or_init(|| material))
    }

    pub fn client_mac_secret(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.client_mac_secret)
    }

    pub fn server_mac_secret(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.server_mac_secret)
    }

    pub fn client_key(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.client_key)
    }

    pub fn server_key(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.server_key)
    }

    pub fn iv_client(&self) -> PResult<Vec<u8>> {
        Ok(self.material()?.iv_client.clone())
    }

    pub fn iv_server(&self) -> PResult<Vec<u8>> {
        Ok(self.material()?.iv_server.clone())
    }

    /// Raw structure as currently stored in unmanaged memory
    pub fn to_marshalable_structure(&self) -> PResult<CK_SSL3_KEY_MAT_OUT<L>> {
        self.ensure_active()?;
        self.blocks
            .borrow()
            .structure
            .read_struct::<CK_SSL3_KEY_MAT_OUT<L>>()?
            .context("the returned key material structure is not allocated")
    }
}

impl<L: CkLayout> KeyMaterialOutput for Ssl3KeyMatOut<L> {
    const NAME: &'static str = "Ssl3KeyMatOut";

    fn read_back(&self) -> PResult<()> {
        self.material().map(|_| ())
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let mut blocks = self.blocks.borrow_mut();
        blocks.structure.free();
        blocks.iv_client.free();
        blocks.iv_server.free();
        trace!("{} disposed", Self::NAME);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl<L: CkLayout> Drop for Ssl3KeyMatOut<L> {
    fn drop(&mut self) {
        if !self.disposed.get() {
            debug!("{} released on drop", Self::NAME);
            self.dispose();
        }
    }
}

/// Handles and IV returned by a WTLS key and MAC derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WtlsKeyMaterial {
    pub mac_secret: CK_OBJECT_HANDLE,
    pub key: CK_OBJECT_HANDLE,
    pub iv: Vec<u8>,
}

#[derive(Debug)]
struct WtlsKeyMatOutBlocks {
    structure: UnmanagedBlock,
    iv: UnmanagedBlock,
}

/// `CK_WTLS_KEY_MAT_OUT` backed by unmanaged memory
#[derive(Debug)]
pub struct WtlsKeyMatOut<L: CkLayout> {
    blocks: RefCell<WtlsKeyMatOutBlocks>,
    iv_len: usize,
    material: OnceCell<WtlsKeyMaterial>,
    disposed: Cell<bool>,
    _layout: PhantomData<L>,
}

impl<L: CkLayout> WtlsKeyMatOut<L> {
    pub(crate) fn allocate(iv_len: usize) -> PResult<Self> {
        let iv = UnmanagedBlock::allocate(iv_len)?;
        let mut structure = UnmanagedBlock::allocate(size_of::<CK_WTLS_KEY_MAT_OUT<L>>())?;
        structure.write_struct(&CK_WTLS_KEY_MAT_OUT::<L> {
            pIV: iv.ptr(),
            ..CK_WTLS_KEY_MAT_OUT::zeroed()
        })?;
        Ok(Self {
            blocks: RefCell::new(WtlsKeyMatOutBlocks { structure, iv }),
            iv_len,
            material: OnceCell::new(),
            disposed: Cell::new(false),
            _layout: PhantomData,
        })
    }

    pub(crate) fn structure_ptr(&self) -> L::Ptr {
        self.blocks.borrow().structure.ptr()
    }

    fn ensure_active(&self) -> PResult<()> {
        if self.disposed.get() {
            return Err(Pkcs11Error::Disposed(Self::NAME));
        }
        Ok(())
    }

    pub fn material(&self) -> PResult<&WtlsKeyMaterial> {
        self.ensure_active()?;
        if let Some(material) = self.material.get() {
            return Ok(material);
        }
        let blocks = self.blocks.borrow();
        let out = blocks
            .structure
            .read_struct::<CK_WTLS_KEY_MAT_OUT<L>>()?
            .context("the returned key material structure is not allocated")?;
        let material = WtlsKeyMaterial {
            mac_secret: out.hMacSecret.to_u64(),
            key: out.hKey.to_u64(),
            iv: blocks.iv.read(self.iv_len)?.unwrap_or_default(),
        };
        Ok(self.material.get_or_init(|| material))
    }

    pub fn mac_secret(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.mac_secret)
    }

    pub fn key(&self) -> PResult<CK_OBJECT_HANDLE> {
        Ok(self.material()?.key)
    }

    pub fn iv(&self) -> PResult<Vec<u8>> {
        Ok(self.material()?.iv.clone())
    }

    pub fn to_marshalable_structure(&self) -> PResult<CK_WTLS_KEY_MAT_OUT<L>> {
        self.ensure_active()?;
        self.blocks
            .borrow()
            .structure
            .read_struct::<CK_WTLS_KEY_MAT_OUT<L>>()?
            .context("the returned key material structure is not allocated")
    }
}

impl<L: CkLayout> KeyMaterialOutput for WtlsKeyMatOut<L> {
    const NAME: &'static str = "WtlsKeyMatOut";

    fn read_back(&self) -> PResult<()> {
        self.material().map(|_| ())
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let mut blocks = self.blocks.borrow_mut();
        blocks.structure.free();
        blocks.iv.free();
        trace!("{} disposed", Self::NAME);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl<L: CkLayout> Drop for WtlsKeyMatOut<L> {
    fn drop(&mut self) {
        if !self.disposed.get() {
            debug!("{} released on drop", Self::NAME);
            self.dispose();
        }
    }
}

/// Output buffer of a PRF: `pOutput` and `pulOutputLen`
#[derive(Debug)]
pub(crate) struct PrfOutput {
    output: UnmanagedBlock,
    output_len: UnmanagedBlock,
}

impl PrfOutput {
    pub(crate) fn allocate<L: CkLayout>(capacity: usize, capacity_ulong: L::Ulong) -> PResult<Self> {
        Ok(Self {
            output: UnmanagedBlock::allocate(capacity)?,
            output_len: UnmanagedBlock::from_ulong(capacity_ulong)?,
        })
    }

    pub(crate) fn output_ptr<P: NativePtr>(&self) -> P {
        self.output.ptr()
    }

    pub(crate) fn output_len_ptr<P: NativePtr>(&self) -> P {
        self.output_len.ptr()
    }

    /// Bytes written by the token, as many as it reported in `pulOutputLen`
    pub(crate) fn read<L: CkLayout>(&self) -> PResult<Vec<u8>> {
        let reported = self
            .output_len
            .read_ulong::<L::Ulong>()?
            .context("the PRF output length is not allocated")?
            .to_u64();
        let len = usize::try_from(reported)
            .context("PRF output length")?
            .min(self.output.len());
        Ok(self.output.read(len)?.unwrap_or_default())
    }
}

impl Release for PrfOutput {
    fn release(&mut self) {
        self.output.free();
        self.output_len.free();
    }
}
