mod common;

use common::*;

use si4735::config::Config;
use si4735::constants::*;
use si4735::system::Function;

/// FM_RDS_STATUS response with RDSRECV and NEWBLOCKA set
fn group(b: u16, c: &[u8; 2], d: &[u8; 2]) -> [u8; 13] {
    [0x84, 0x11, 0x01, 0x02, 0xC2, 0x01, (b >> 8) as u8, b as u8, c[0], c[1], d[0], d[1], 0]
}

#[tokio::test]
async fn station_name() {
    let fake = FakeSi4735::new();
    for (addr, chars) in [(0u16, b"BB"), (1, b"C "), (2, b"R4"), (3, b"  ")] {
        fake.respond(&group(0x0400 | addr, &[0, 0], chars));
    }
    let mut dev = driver(&fake);
    for _ in 0..4 {
        let rsp = dev.get_rds_status(true, false, false).await.unwrap();
        assert!(rsp.is_some_and(|r| r.rds_received()));
    }
    assert_eq!(fake.frames(0x24), vec![vec![0x24, 0x01]; 4]);
    let rds = dev.rds();
    assert_eq!(rds.station_name(), Some("BBC R4  "));
    assert_eq!(rds.program_id(), Some(0xC201));
    assert_eq!(rds.program_type(), Some(0));
    assert_eq!(dev.rds_status().map(|r| r.fifo_used()), Some(2));
    finish(dev);
}

#[tokio::test]
async fn radio_text_ends_on_carriage_return() {
    let fake = FakeSi4735::new();
    fake.respond(&group(0x2000, b"Th", b"is"));
    fake.respond(&group(0x2001, b" i", b"s "));
    fake.respond(&group(0x2002, b"a\r", b"zz"));
    let mut dev = driver(&fake);
    for _ in 0..3 {
        dev.get_rds_status(true, false, false).await.unwrap();
    }
    assert_eq!(dev.rds().radio_text_2a(), Some("This is a"));
    finish(dev);
}

#[tokio::test]
async fn retune_clears_text() {
    let fake = FakeSi4735::new();
    fake.respond(&group(0x0000, &[0, 0], b"OL"));
    fake.respond(&group(0x0001, &[0, 0], b"D "));
    let mut dev = driver(&fake);
    dev.get_rds_status(true, false, false).await.unwrap();
    dev.get_rds_status(true, false, false).await.unwrap();
    assert_eq!(dev.rds().station_name().map(|n| &n[..4]), Some("OLD "));

    dev.set_frequency(9800).await.unwrap();
    fake.respond(&group(0x0003, &[0, 0], b"XY"));
    dev.get_rds_status(true, false, false).await.unwrap();
    assert_eq!(dev.rds().station_name(), Some("      XY"));
    finish(dev);
}

#[tokio::test]
async fn config_resets_decoder() {
    let fake = FakeSi4735::new();
    fake.respond(&group(0x0000, &[0, 0], b"AB"));
    let mut dev = driver(&fake);
    dev.get_rds_status(true, false, false).await.unwrap();
    assert!(dev.rds().station_name().is_some());

    dev.set_rds_config(true, 2, 2, 2, 2).await.unwrap();
    assert_eq!(dev.rds().station_name(), None);
    assert_eq!(dev.rds().program_id(), None);
    assert_eq!(fake.properties(), vec![(PROP_FM_RDS_CONFIG, 0xAA01)]);
    finish(dev);
}

#[tokio::test]
async fn rds_setters() {
    let fake = FakeSi4735::new();
    let mut dev = driver(&fake);
    dev.set_rds_int_source(false, false, false, false, true).await.unwrap();
    dev.set_rds_fifo_count(4).await.unwrap();
    assert_eq!(fake.properties(), vec![(PROP_FM_RDS_INT_SOURCE, 1), (PROP_FM_RDS_INT_FIFO_COUNT, 4)]);
    finish(dev);
}

#[tokio::test]
async fn ignored_outside_fm() {
    let fake = FakeSi4735::new();
    let cfg = Config::default().with_function(Function::AmReceive);
    let mut dev = driver_with(&fake, cfg, &[]);
    assert_eq!(dev.get_rds_status(true, false, false).await.map(|r| r.is_none()), Ok(true));
    dev.set_rds_int_source(true, true, true, true, true).await.unwrap();
    dev.set_rds_fifo_count(4).await.unwrap();
    assert!(fake.writes().is_empty());
    assert_eq!(fake.reads(), 0);
    finish(dev);
}

#[tokio::test]
async fn clock_time() {
    let fake = FakeSi4735::new();
    // MJD 60369 (2024-02-29) 08:15 UTC, offset +02:00
    let mjd: u32 = 60369;
    let b = 0x4000 | ((mjd >> 15) & 0x3) as u16;
    let c = (((mjd & 0x7FFF) << 1) as u16) | (8 >> 4);
    let d = ((8u16 & 0xF) << 12) | (15 << 6) | 4;
    fake.respond(&group(b, &c.to_be_bytes(), &d.to_be_bytes()));
    let mut dev = driver(&fake);
    dev.get_rds_status(true, false, false).await.unwrap();
    let dt = dev.rds().date_time().copied().unwrap();
    assert_eq!((dt.year, dt.month, dt.day), (2024, 2, 29));
    assert_eq!((dt.hour, dt.minute), (8, 15));
    assert_eq!(dt.to_string(), "08:15 +02:00");
    finish(dev);
}
