use super::*;

#[test]
fn lighter_adds_and_saturates() {
    assert_eq!(lighter([10, 20, 30, 40], [1, 2, 3, 4]), [11, 22, 33, 44]);
    assert_eq!(lighter([200, 0, 0, 200], [100, 0, 0, 100]), [255, 0, 0, 255]);
    assert_eq!(lighter([5, 6, 7, 8], [0; 4]), [5, 6, 7, 8]);
}

#[test]
fn scale_by_coverage() {
    assert_eq!(scale([200, 100, 50, 200], 255), [200, 100, 50, 200]);
    assert_eq!(scale([200, 100, 50, 200], 0), [0; 4]);
    assert_eq!(scale([254, 254, 254, 254], 128), [127, 127, 127, 127]);
}

#[test]
fn lighter_in_place_checks_lengths() {
    let mut dst = vec![1u8; 8];
    assert!(lighter_in_place(&mut dst, &[1u8; 4]).is_err());
    lighter_in_place(&mut dst, &[1u8; 8]).unwrap();
    assert_eq!(dst, vec![2u8; 8]);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut buf = vec![128, 0, 64, 128, 9, 9, 9, 0, 10, 20, 30, 255];
    unpremultiply_in_place(&mut buf);
    assert_eq!(&buf[..4], &[255, 0, 128, 128]);
    assert_eq!(&buf[4..8], &[0, 0, 0, 0]);
    assert_eq!(&buf[8..], &[10, 20, 30, 255]);
}

#[test]
fn fill_writes_every_pixel() {
    let mut buf = vec![0u8; 12];
    fill(&mut buf, [1, 2, 3, 4]);
    assert_eq!(buf, [1, 2, 3, 4].repeat(3));
}
