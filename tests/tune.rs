mod common;

use common::*;

use si4735::config::Config;
use si4735::constants::*;
use si4735::system::Function;
use si4735::{Si4735Error, TuneCmd};

fn am_driver(fake: &FakeSi4735) -> Driver {
    driver_with(fake, Config::default().with_function(Function::AmReceive), &[])
}

#[tokio::test]
async fn fm_tune_frame() {
    let fake = FakeSi4735::new();
    let mut dev = driver(&fake);
    dev.set_frequency(10390).await.unwrap();
    assert_eq!(fake.writes(), vec![vec![0x20, 0x03, 0x28, 0x96, 0x00]]);
    // Cached value, no read back
    let reads = fake.reads();
    assert_eq!(dev.current_frequency(), 10390);
    assert_eq!(fake.reads(), reads);
    finish(dev);
}

#[tokio::test]
async fn out_of_band_rejected() {
    let fake = FakeSi4735::new();
    let mut dev = driver(&fake);
    assert_eq!(dev.set_frequency(11000).await, Err(Si4735Error::FrequencyOutOfRange));
    assert_eq!(dev.set_frequency(6300).await, Err(Si4735Error::FrequencyOutOfRange));
    assert!(fake.writes().is_empty());
    assert_eq!(dev.current_frequency(), 10390);
    finish(dev);
}

#[tokio::test]
async fn am_band_wrap() {
    let fake = FakeSi4735::new();
    let mut dev = am_driver(&fake);
    dev.set_frequency(1710).await.unwrap();
    dev.frequency_up().await.unwrap();
    assert_eq!(dev.current_frequency(), 520);
    dev.frequency_down().await.unwrap();
    assert_eq!(dev.current_frequency(), 1710);
    dev.set_frequency_step(9);
    dev.frequency_down().await.unwrap();
    assert_eq!(dev.current_frequency(), 1701);
    assert_eq!(fake.frames(0x40).last(), Some(&vec![0x40, 0x01, 0x06, 0xA5, 0x00, 0x00]));
    finish(dev);
}

#[tokio::test]
async fn antenna_capacitor() {
    let fake = FakeSi4735::new();
    let mut dev = am_driver(&fake);
    dev.set_tune_antenna_capacitor(6143);
    dev.set_tune_antenna_capacitor(6144);
    dev.set_frequency(1000).await.unwrap();
    assert_eq!(fake.writes(), vec![vec![0x40, 0x01, 0x03, 0xE8, 0x17, 0xFF]]);
    finish(dev);
}

#[tokio::test]
async fn read_back_frequency() {
    let fake = FakeSi4735::new();
    fake.respond_tune_status(10390);
    let mut dev = driver(&fake);
    assert_eq!(dev.get_frequency().await.unwrap(), 10390);
    assert_eq!(fake.writes(), vec![vec![0x22, 0x02]]);
    assert_eq!(dev.tune_status().rssi(), 40);
    assert_eq!(dev.tune_status().snr(), 20);
    assert!(dev.tune_status().valid());
    finish(dev);
}

#[tokio::test]
async fn status_refreshes_frequency() {
    let fake = FakeSi4735::new();
    fake.respond_tune_status(9850);
    let mut dev = driver(&fake);
    dev.set_frequency(10390).await.unwrap();
    fake.clear();
    let mut rsp = dev.get_status(true, false).await.unwrap();
    assert!(rsp.status().stc_int());
    assert_eq!(fake.writes(), vec![vec![0x22, 0x01]]);
    assert_eq!(dev.current_frequency(), 9850);
    finish(dev);
}

#[tokio::test]
async fn seek_up_reads_destination() {
    let fake = FakeSi4735::new();
    fake.respond_tune_status(9850);
    let mut dev = driver(&fake);
    assert_eq!(dev.seek_station_up().await.unwrap(), 9850);
    assert_eq!(dev.current_frequency(), 9850);
    assert_eq!(fake.writes(), vec![vec![0x21, 0x0C], vec![0x22, 0x02]]);
    finish(dev);
}

#[tokio::test]
async fn am_seek_down() {
    let fake = FakeSi4735::new();
    fake.respond_tune_status(1050);
    let mut dev = am_driver(&fake);
    assert_eq!(dev.seek_station_down().await.unwrap(), 1050);
    assert_eq!(fake.frames(0x41), vec![vec![0x41, 0x04, 0x00, 0x00, 0x00, 0x00]]);
    assert_eq!(fake.frames(0x42), vec![vec![0x42, 0x02]]);
    finish(dev);
}

#[tokio::test]
async fn rsq_status() {
    let fake = FakeSi4735::new();
    fake.respond(&[0x80, 0x00, 0x01, 0x9F, 35, 18, 5, 0xFE]);
    let mut dev = driver(&fake);
    let rsq = dev.get_rsq(true).await.unwrap();
    assert_eq!(fake.writes(), vec![vec![0x23, 0x01]]);
    assert!(rsq.valid());
    assert!(rsq.pilot());
    assert_eq!(rsq.stereo_blend(), 0x1F);
    assert_eq!(rsq.rssi(), 35);
    assert_eq!(rsq.snr(), 18);
    assert_eq!(rsq.multipath(), 5);
    assert_eq!(rsq.freq_offset(), -2);
    assert_eq!(dev.rsq_status(), &rsq);
    finish(dev);
}

#[tokio::test]
async fn agc() {
    let fake = FakeSi4735::new();
    fake.respond(&[0x80, 0x01, 0x0A]);
    let mut dev = am_driver(&fake);
    let agc = dev.get_agc().await.unwrap();
    assert!(agc.agc_disabled());
    assert_eq!(agc.agc_index(), 10);
    dev.set_agc(true, 12).await.unwrap();
    assert_eq!(fake.writes(), vec![vec![0x47], vec![0x48, 0x01, 0x0C]]);
    finish(dev);
}

#[tokio::test]
async fn am_properties() {
    let fake = FakeSi4735::new();
    let mut dev = am_driver(&fake);
    dev.set_bandwidth(2, true).await.unwrap();
    dev.set_bandwidth(7, false).await.unwrap();
    dev.set_avc_am_max_gain(90).await.unwrap();
    dev.set_seek_am_limits(520, 1710).await.unwrap();
    dev.set_seek_am_spacing(10).await.unwrap();
    assert_eq!(fake.properties(), vec![
        (PROP_AM_CHANNEL_FILTER, 0x0102),
        (PROP_AM_AUTOMATIC_VOLUME_CONTROL_MAX_GAIN, 90 * 340),
        (PROP_AM_SEEK_BAND_BOTTOM, 520),
        (PROP_AM_SEEK_BAND_TOP, 1710),
        (PROP_AM_SEEK_FREQ_SPACING, 10),
    ]);
    assert_eq!(dev.tuning().cmd, TuneCmd::Am);
    finish(dev);
}

#[tokio::test]
async fn bandwidth_ignored_in_fm() {
    let fake = FakeSi4735::new();
    let mut dev = driver(&fake);
    dev.set_bandwidth(1, false).await.unwrap();
    assert!(fake.writes().is_empty());
    finish(dev);
}
