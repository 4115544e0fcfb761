//! Writing position and capture metadata into images.
//!
//! Field values are computed into [`Field`]s first; an [`ImageMetadata`]
//! container turns them into its own tag representation and saves the file.

use crate::angle::SexagesimalAngle;
use crate::error::GeotagError;
use crate::rational::{SRational, URational};
use crate::track::Fix;
use anyhow::Result;
use chrono::{Local, TimeZone};
use little_exif::endian::Endian;
use little_exif::exif_tag::ExifTag;
use little_exif::ifd::ExifTagGroup;
use little_exif::exif_tag_format::ExifTagFormat;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::fmt;
use std::path::Path;
use tracing::warn;

const TAG_GPS_IMG_DIRECTION_REF: u16 = 0x0010;
const TAG_GPS_IMG_DIRECTION: u16 = 0x0011;
const TAG_GPS_DATE_STAMP: u16 = 0x001d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeRef {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeRef {
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeRef {
    AboveSeaLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionRef {
    True,
}

impl LatitudeRef {
    pub fn of(angle: &SexagesimalAngle) -> Self {
        if angle.negative {
            LatitudeRef::South
        } else {
            LatitudeRef::North
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatitudeRef::North => "N",
            LatitudeRef::South => "S",
        }
    }
}

impl LongitudeRef {
    pub fn of(angle: &SexagesimalAngle) -> Self {
        if angle.negative {
            LongitudeRef::West
        } else {
            LongitudeRef::East
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LongitudeRef::East => "E",
            LongitudeRef::West => "W",
        }
    }
}

impl AltitudeRef {
    pub fn as_byte(&self) -> u8 {
        match self {
            AltitudeRef::AboveSeaLevel => 0,
        }
    }
}

impl DirectionRef {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionRef::True => "T",
        }
    }
}

/// One metadata value to store in an image.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    LatitudeRef(LatitudeRef),
    Latitude([URational; 3]),
    LongitudeRef(LongitudeRef),
    Longitude([URational; 3]),
    AltitudeRef(AltitudeRef),
    Altitude(URational),
    DateStamp(String),
    DateTimeDigitized(String),
    Make(String),
    Model(String),
    ImageDescription(String),
    ImgDirectionRef(DirectionRef),
    ImgDirection(SRational),
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::LatitudeRef(_) => "GPSLatitudeRef",
            Field::Latitude(_) => "GPSLatitude",
            Field::LongitudeRef(_) => "GPSLongitudeRef",
            Field::Longitude(_) => "GPSLongitude",
            Field::AltitudeRef(_) => "GPSAltitudeRef",
            Field::Altitude(_) => "GPSAltitude",
            Field::DateStamp(_) => "GPSDateStamp",
            Field::DateTimeDigitized(_) => "DateTimeDigitized",
            Field::Make(_) => "Make",
            Field::Model(_) => "Model",
            Field::ImageDescription(_) => "ImageDescription",
            Field::ImgDirectionRef(_) => "GPSImgDirectionRef",
            Field::ImgDirection(_) => "GPSImgDirection",
        }
    }
}

/// Position in the form photo tools print it, e.g.
/// `34 deg 44' 16".440 N, 82 deg 15' 20".484 W`.
pub fn describe(fix: &Fix) -> String {
    let lat = SexagesimalAngle::from_degrees(fix.latitude);
    let lon = SexagesimalAngle::from_degrees(fix.longitude);
    format!(
        "{}, {}",
        describe_angle(&lat, LatitudeRef::of(&lat).as_str()),
        describe_angle(&lon, LongitudeRef::of(&lon).as_str())
    )
}

fn describe_angle(angle: &SexagesimalAngle, reference: &str) -> String {
    format!(
        "{} deg {:02}' {:02}\".{:03} {}",
        angle.degrees, angle.minutes, angle.seconds, angle.milliseconds, reference
    )
}

/// Fixed identification written to every tagged image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub make: String,
    pub model: String,
    pub description: String,
}

/// An opened image whose metadata can be changed and written back.
pub trait ImageMetadata {
    /// Sets a field, replacing any previous value of the same field.
    fn set(&mut self, field: Field) -> Result<()>;
    fn save(&self, path: &Path) -> Result<()>;
}

fn dms(angle: &SexagesimalAngle) -> [URational; 3] {
    [
        URational::new(angle.degrees, 1),
        URational::new(angle.minutes, 1),
        URational::new(angle.seconds_millis(), 1000),
    ]
}

/// Builds every field for one fix. `local` is the zone used for the
/// digitized timestamp; the GPS date stamp is always UTC.
///
/// A heading is wrapped into [0, 360) and kept as an [`SRational`], the
/// signed direction type. Containers that store GPSImgDirection as an
/// unsigned RATIONAL convert it with `URational::try_from`, which cannot
/// fail after the wrap.
pub fn fields<Tz: TimeZone>(
    fix: &Fix,
    heading: Option<f64>,
    device: &Device,
    local: &Tz,
) -> Result<Vec<Field>, GeotagError>
where
    Tz::Offset: fmt::Display,
{
    for value in [fix.latitude, fix.longitude, fix.elevation] {
        if !value.is_finite() {
            return Err(GeotagError::NonFiniteCoordinate(value));
        }
    }

    let lat = SexagesimalAngle::from_degrees(fix.latitude);
    let lon = SexagesimalAngle::from_degrees(fix.longitude);

    let mut fields = vec![
        Field::DateTimeDigitized(
            fix.time
                .with_timezone(local)
                .format("%Y:%m:%d %H:%M:%S")
                .to_string(),
        ),
        Field::DateStamp(fix.time.format("%Y:%m:%d").to_string()),
        Field::Make(device.make.clone()),
        Field::Model(device.model.clone()),
        Field::Latitude(dms(&lat)),
        Field::LatitudeRef(LatitudeRef::of(&lat)),
        Field::Longitude(dms(&lon)),
        Field::LongitudeRef(LongitudeRef::of(&lon)),
        Field::Altitude(URational::from_f64(fix.elevation)),
        Field::AltitudeRef(AltitudeRef::AboveSeaLevel),
        Field::ImageDescription(device.description.clone()),
    ];

    if let Some(heading) = heading {
        if !heading.is_finite() {
            return Err(GeotagError::NonFiniteCoordinate(heading));
        }
        fields.push(Field::ImgDirection(SRational::from_f64(
            heading.rem_euclid(360.0),
        )));
        fields.push(Field::ImgDirectionRef(DirectionRef::True));
    }

    Ok(fields)
}

/// Writes one fix into an opened image and saves it in place.
pub fn apply<M: ImageMetadata>(
    image: &mut M,
    path: &Path,
    fix: &Fix,
    heading: Option<f64>,
    device: &Device,
) -> Result<()> {
    for field in fields(fix, heading, device, &Local)? {
        image.set(field)?;
    }
    image.save(path)
}

/// [`ImageMetadata`] backed by `little_exif`.
pub struct ExifImage {
    metadata: Metadata,
}

impl ExifImage {
    pub fn open(path: &Path) -> Self {
        let metadata = match Metadata::new_from_path(path) {
            Ok(m) => m,
            Err(e) => {
                warn!("Could not read EXIF from {:?}: {:?}, starting empty", path, e);
                Metadata::new()
            }
        };
        Self { metadata }
    }
}

fn ur64(r: URational) -> uR64 {
    uR64 {
        nominator: r.numerator,
        denominator: r.denominator,
    }
}

fn gps_string(tag: &'static str, id: u16, value: &str) -> Result<ExifTag, GeotagError> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    ExifTag::from_u16_with_data(
        id,
        &ExifTagFormat::STRING,
        &bytes,
        &Endian::Little,
        &ExifTagGroup::GPS,
    )
    .map_err(|e| GeotagError::Tag {
        tag,
        reason: format!("{:?}", e),
    })
}

fn exif_tag(field: Field) -> Result<ExifTag, GeotagError> {
    let tag = match field {
        Field::LatitudeRef(r) => ExifTag::GPSLatitudeRef(r.as_str().to_string()),
        Field::Latitude(v) => ExifTag::GPSLatitude(v.into_iter().map(ur64).collect()),
        Field::LongitudeRef(r) => ExifTag::GPSLongitudeRef(r.as_str().to_string()),
        Field::Longitude(v) => ExifTag::GPSLongitude(v.into_iter().map(ur64).collect()),
        Field::AltitudeRef(r) => ExifTag::GPSAltitudeRef(vec![r.as_byte()]),
        Field::Altitude(v) => ExifTag::GPSAltitude(vec![ur64(v)]),
        Field::DateStamp(s) => gps_string("GPSDateStamp", TAG_GPS_DATE_STAMP, &s)?,
        Field::DateTimeDigitized(s) => ExifTag::CreateDate(s),
        Field::Make(s) => ExifTag::Make(s),
        Field::Model(s) => ExifTag::Model(s),
        Field::ImageDescription(s) => ExifTag::ImageDescription(s),
        Field::ImgDirectionRef(r) => {
            gps_string("GPSImgDirectionRef", TAG_GPS_IMG_DIRECTION_REF, r.as_str())?
        }
        Field::ImgDirection(v) => {
            // the container only has RATIONAL for this tag
            let v = URational::try_from(v).map_err(|v| GeotagError::Tag {
                tag: "GPSImgDirection",
                reason: format!("negative heading {}/{}", v.numerator, v.denominator),
            })?;
            let mut bytes = Vec::with_capacity(8);
            bytes.extend_from_slice(&v.numerator.to_le_bytes());
            bytes.extend_from_slice(&v.denominator.to_le_bytes());
            ExifTag::from_u16_with_data(
                TAG_GPS_IMG_DIRECTION,
                &ExifTagFormat::RATIONAL64U,
                &bytes,
                &Endian::Little,
                &ExifTagGroup::GPS,
            )
            .map_err(|e| GeotagError::Tag {
                tag: "GPSImgDirection",
                reason: format!("{:?}", e),
            })?
        }
    };
    Ok(tag)
}

impl ImageMetadata for ExifImage {
    fn set(&mut self, field: Field) -> Result<()> {
        self.metadata.set_tag(exif_tag(field)?);
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.metadata.write_to_file(path).map_err(|e| {
            anyhow::anyhow!("Failed to write EXIF metadata to {:?}: {:?}", path, e)
        })
    }
}

/// In-memory container for tests: keeps the last value per field.
#[cfg(test)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryImage {
    pub fields: std::collections::BTreeMap<&'static str, Field>,
    pub saves: std::cell::Cell<usize>,
}

#[cfg(test)]
impl ImageMetadata for MemoryImage {
    fn set(&mut self, field: Field) -> Result<()> {
        self.fields.insert(field.name(), field);
        Ok(())
    }

    fn save(&self, _path: &Path) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
