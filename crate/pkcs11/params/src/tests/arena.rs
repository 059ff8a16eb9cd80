use cosmian_logger::log_init;
use cosmian_pkcs11_sys::{CK_VERSION, PackedU32, PackedU64};

use crate::{
    Pkcs11Error,
    arena::{ArenaStats, UnmanagedBlock, reset_stats, stats},
    tests::read_bytes,
};

#[test]
fn test_round_trip() {
    log_init(None);
    for len in [0, 1, 16, 4096] {
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let block = UnmanagedBlock::from_bytes(&data).unwrap();
        assert_eq!(block.len(), len);
        assert_eq!(block.is_null(), len == 0);
        assert_eq!(block.to_vec().unwrap(), data);
        if len > 0 {
            assert_eq!(read_bytes(block.as_ptr(), len), data);
        }
    }
}

#[test]
fn test_absent_input_is_null() {
    let block = UnmanagedBlock::from_optional(None).unwrap();
    assert!(block.is_null());
    assert!(block.is_empty());
    assert!(block.as_ptr().is_null());
    assert_eq!(block.read(0).unwrap(), None);
    assert!(block.to_vec().unwrap().is_empty());
}

#[test]
fn test_allocation_is_zeroed() {
    let block = UnmanagedBlock::allocate(64).unwrap();
    assert_eq!(block.to_vec().unwrap(), vec![0_u8; 64]);
}

#[test]
fn test_free_is_idempotent() {
    reset_stats();
    let mut block = UnmanagedBlock::allocate(32).unwrap();
    assert_eq!(
        stats(),
        ArenaStats {
            allocations: 1,
            frees: 0,
            live_bytes: 32
        }
    );
    block.free();
    assert!(block.is_null());
    assert_eq!(block.len(), 0);
    block.free();
    drop(block);
    assert_eq!(
        stats(),
        ArenaStats {
            allocations: 1,
            frees: 1,
            live_bytes: 0
        }
    );
}

#[test]
fn test_drop_frees() {
    reset_stats();
    {
        let _block = UnmanagedBlock::from_bytes(b"secret").unwrap();
        assert_eq!(stats().live_bytes, 6);
    }
    assert_eq!(stats().frees, 1);
    assert_eq!(stats().live_bytes, 0);
}

#[test]
fn test_released_block_is_never_read() {
    let mut block = UnmanagedBlock::from_bytes(&[1, 2, 3]).unwrap();
    block.free();
    assert_eq!(block.read(3).unwrap(), None);
    assert_eq!(block.read_ulong::<u64>().unwrap(), None);
    assert_eq!(block.read_struct::<CK_VERSION>().unwrap(), None);
}

#[test]
fn test_overflow() {
    let mut block = UnmanagedBlock::allocate(4).unwrap();
    assert!(matches!(
        block.write(&[0; 5]),
        Err(Pkcs11Error::BufferOverflow {
            capacity: 4,
            requested: 5
        })
    ));
    assert!(matches!(
        block.read(8),
        Err(Pkcs11Error::BufferOverflow {
            capacity: 4,
            requested: 8
        })
    ));
    assert!(matches!(
        block.write_ulong(7_u64),
        Err(Pkcs11Error::BufferOverflow { .. })
    ));
    block.write(&[9, 8]).unwrap();
    assert_eq!(block.to_vec().unwrap(), vec![9, 8, 0, 0]);
}

#[test]
fn test_ulongs() {
    let block = UnmanagedBlock::from_ulong(0xDEAD_BEEF_u32).unwrap();
    assert_eq!(block.len(), 4);
    assert_eq!(block.read_ulong::<u32>().unwrap(), Some(0xDEAD_BEEF));

    let block = UnmanagedBlock::from_ulong(PackedU64::default()).unwrap();
    assert_eq!(block.len(), 8);
    assert_eq!(block.to_vec().unwrap(), vec![0; 8]);

    let mut block = UnmanagedBlock::allocate(4).unwrap();
    block.write_ulong(PackedU32::default()).unwrap();
    assert_eq!(block.read_ulong::<PackedU32>().unwrap(), Some(PackedU32::default()));
}

#[test]
fn test_structs() {
    let mut block = UnmanagedBlock::allocate(size_of::<CK_VERSION>()).unwrap();
    assert_eq!(
        block.read_struct::<CK_VERSION>().unwrap(),
        Some(CK_VERSION::default())
    );
    let version = CK_VERSION { major: 3, minor: 1 };
    block.write_struct(&version).unwrap();
    assert_eq!(block.read_struct::<CK_VERSION>().unwrap(), Some(version));
    assert_eq!(block.to_vec().unwrap(), vec![3, 1]);

    let block = UnmanagedBlock::from_member(&version).unwrap();
    assert_eq!(block.to_vec().unwrap(), vec![3, 1]);
}

#[test]
fn test_lengths_no_allocation_can_hold() {
    reset_stats();
    for len in [usize::MAX, isize::MAX as usize] {
        assert!(matches!(
            UnmanagedBlock::allocate(len),
            Err(Pkcs11Error::Allocation(l)) if l == len
        ));
    }
    assert_eq!(stats(), ArenaStats::default());
}
