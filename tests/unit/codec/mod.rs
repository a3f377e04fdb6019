use super::*;

#[test]
fn filter_names_parse_case_insensitively() {
    assert_eq!("fant".parse::<ImageFilter>(), Ok(ImageFilter::Fant));
    assert_eq!("POINT".parse::<ImageFilter>(), Ok(ImageFilter::Point));
    assert!("bilinear".parse::<ImageFilter>().is_err());
    for f in ImageFilter::ALL {
        assert_eq!(f.to_string().parse::<ImageFilter>(), Ok(f));
    }
}

#[test]
fn filters_map_to_resamplers() {
    use image::imageops::FilterType;
    assert_eq!(ImageFilter::Point.resample(), FilterType::Nearest);
    assert_eq!(ImageFilter::Cubic.resample(), FilterType::CatmullRom);
    assert_eq!(ImageFilter::default().resample(), FilterType::Triangle);
}
